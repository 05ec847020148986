//! Process lifecycle: bootstrap, serve, wait for a termination signal, stop.

mod errors;
mod launch;
mod shutdown;

pub use self::errors::{LaunchError, ShutdownError};
pub use self::launch::run_daemon;
pub(crate) use self::launch::run_daemon_with;
pub use self::shutdown::{ShutdownSignal, SystemShutdownSignal};

const PROCESS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::process");
