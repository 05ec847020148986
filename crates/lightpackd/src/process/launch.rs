//! Daemon entry point.

use std::sync::Arc;

use tracing::info;

use crate::api::Collaborators;
use crate::bootstrap::{ConfigLoader, SystemConfigLoader, bootstrap_with};
use crate::health::{HealthReporter, StructuredHealthReporter};

use super::PROCESS_TARGET;
use super::errors::LaunchError;
use super::shutdown::{ShutdownSignal, SystemShutdownSignal};

/// Runs the daemon using the production collaborators.
///
/// # Errors
///
/// Returns a [`LaunchError`] when bootstrap fails, the API listener cannot be
/// bound, or signal handlers cannot be installed.
pub fn run_daemon() -> Result<(), LaunchError> {
    let reporter = Arc::new(StructuredHealthReporter::new());
    run_daemon_with(&SystemConfigLoader, reporter, SystemShutdownSignal::new())
}

/// Runs the daemon with injected collaborators.
pub(crate) fn run_daemon_with<L, S>(
    loader: &L,
    reporter: Arc<dyn HealthReporter>,
    shutdown: S,
) -> Result<(), LaunchError>
where
    L: ConfigLoader,
    S: ShutdownSignal,
{
    info!(target: PROCESS_TARGET, "starting daemon runtime");
    let daemon = bootstrap_with(loader, reporter)?;
    let collaborators = Collaborators::in_memory(&daemon.config().default_profile);
    let mut server = daemon.api_server(collaborators);
    server.start()?;
    if !server.is_running() {
        info!(target: PROCESS_TARGET, "API server disabled by configuration");
    }

    shutdown.wait()?;
    server.stop()?;
    info!(target: PROCESS_TARGET, "shutdown sequence completed");
    Ok(())
}
