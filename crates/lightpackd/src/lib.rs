//! Remote-control daemon for Lightpack ambient-lighting devices.
//!
//! Clients connect over TCP and exchange newline-terminated text lines with
//! the daemon. Each line is parsed by the [`api`] grammar, checked against
//! the optional key authorization and the single exclusive lock, and only
//! then applied to the shared [`device`] state and forwarded to the lighting
//! pipeline. Every request receives exactly one reply line.
//!
//! The binary wires these pieces into a process: configuration is resolved by
//! [`lightpack_config`], telemetry is installed, the API listener is started,
//! and the daemon runs until a termination signal arrives. Health reporting
//! hooks emit structured events at each lifecycle stage.

pub mod api;
mod bootstrap;
pub mod device;
mod health;
mod process;
mod telemetry;
mod transport;

pub use bootstrap::{
    BootstrapError, ConfigLoader, Daemon, StaticConfigLoader, SystemConfigLoader, bootstrap_with,
};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use process::{LaunchError, ShutdownError, ShutdownSignal, SystemShutdownSignal, run_daemon};
pub use telemetry::{TelemetryError, TelemetryHandle};
pub use transport::ListenerError;

#[cfg(test)]
mod tests;
