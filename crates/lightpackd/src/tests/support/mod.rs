//! Test harness utilities shared by the daemon behavioural suites.

mod client;
mod config_loader;
mod reporter;
mod world;

pub use client::LineClient;
pub use config_loader::TestConfigLoader;
pub use reporter::{HealthEvent, RecordingHealthReporter};
pub use world::{TestWorld, world};
