//! Structured health reporting for daemon lifecycle events.

use std::net::SocketAddr;
use std::sync::Arc;

use lightpack_config::{ApiEndpoint, Config};

use crate::bootstrap::BootstrapError;
use crate::transport::ListenerError;

const HEALTH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::health");

/// Observer trait used to surface lifecycle events to telemetry sinks.
pub trait HealthReporter: Send + Sync {
    /// Invoked before configuration loading begins.
    fn bootstrap_starting(&self);

    /// Invoked after bootstrap completes successfully.
    fn bootstrap_succeeded(&self, config: &Config);

    /// Invoked when bootstrap fails.
    fn bootstrap_failed(&self, error: &BootstrapError);

    /// Invoked once the API listener accepts connections.
    fn api_server_started(&self, endpoint: &ApiEndpoint, addr: SocketAddr);

    /// Invoked after the API listener stops.
    fn api_server_stopped(&self, endpoint: &ApiEndpoint);

    /// Invoked when the API listener fails to start.
    fn api_server_failed(&self, endpoint: &ApiEndpoint, error: &ListenerError);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter,
{
    fn bootstrap_starting(&self) {
        (**self).bootstrap_starting();
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        (**self).bootstrap_succeeded(config);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        (**self).bootstrap_failed(error);
    }

    fn api_server_started(&self, endpoint: &ApiEndpoint, addr: SocketAddr) {
        (**self).api_server_started(endpoint, addr);
    }

    fn api_server_stopped(&self, endpoint: &ApiEndpoint) {
        (**self).api_server_stopped(endpoint);
    }

    fn api_server_failed(&self, endpoint: &ApiEndpoint, error: &ListenerError) {
        (**self).api_server_failed(endpoint, error);
    }
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Builds a new reporter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn bootstrap_starting(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_starting",
            "starting daemon bootstrap"
        );
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_succeeded",
            endpoint = %config.api_endpoint(),
            api_enabled = config.api_enabled,
            auth_enabled = config.api_auth_enabled,
            led_count = config.led_count(),
            log_filter = %config.log_filter(),
            log_format = %config.log_format(),
            "daemon bootstrap completed"
        );
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "bootstrap_failed",
            error = %error,
            "daemon bootstrap failed"
        );
    }

    fn api_server_started(&self, endpoint: &ApiEndpoint, addr: SocketAddr) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "api_server_started",
            endpoint = %endpoint,
            addr = %addr,
            "API server listening"
        );
    }

    fn api_server_stopped(&self, endpoint: &ApiEndpoint) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "api_server_stopped",
            endpoint = %endpoint,
            "API server stopped"
        );
    }

    fn api_server_failed(&self, endpoint: &ApiEndpoint, error: &ListenerError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "api_server_failed",
            endpoint = %endpoint,
            error = %error,
            "API server failed to start"
        );
    }
}
