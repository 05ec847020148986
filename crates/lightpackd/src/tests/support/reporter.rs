//! Test double for [`HealthReporter`] that records structured events for assertions.

use std::net::SocketAddr;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lightpack_config::{ApiEndpoint, Config};

use crate::bootstrap::BootstrapError;
use crate::health::HealthReporter;
use crate::transport::ListenerError;

/// Structured health events tracked during scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthEvent {
    /// Bootstrap started.
    BootstrapStarting,
    /// Bootstrap completed successfully.
    BootstrapSucceeded,
    /// Bootstrap failed with an error description.
    BootstrapFailed(String),
    /// The API listener bound the given address.
    ApiServerStarted(SocketAddr),
    /// The API listener stopped.
    ApiServerStopped,
    /// The API listener failed to start.
    ApiServerFailed(String),
}

/// Records health events for assertions.
#[derive(Debug, Default)]
pub struct RecordingHealthReporter {
    events: Mutex<Vec<HealthEvent>>,
}

impl RecordingHealthReporter {
    /// Captures a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<HealthEvent> {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .clone()
    }

    pub fn record(&self, event: HealthEvent) {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .push(event);
    }

    /// Address reported by the most recent `api_server_started` event.
    #[must_use]
    pub fn started_addr(&self) -> Option<SocketAddr> {
        self.events().into_iter().rev().find_map(|event| match event {
            HealthEvent::ApiServerStarted(addr) => Some(addr),
            _ => None,
        })
    }

    /// Polls until the listener reports its address.
    pub fn wait_for_start(&self, timeout: Duration) -> Option<SocketAddr> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Some(addr) = self.started_addr() {
                return Some(addr);
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        None
    }
}

impl HealthReporter for RecordingHealthReporter {
    fn bootstrap_starting(&self) {
        self.record(HealthEvent::BootstrapStarting);
    }

    fn bootstrap_succeeded(&self, _config: &Config) {
        self.record(HealthEvent::BootstrapSucceeded);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        self.record(HealthEvent::BootstrapFailed(error.to_string()));
    }

    fn api_server_started(&self, _endpoint: &ApiEndpoint, addr: SocketAddr) {
        self.record(HealthEvent::ApiServerStarted(addr));
    }

    fn api_server_stopped(&self, _endpoint: &ApiEndpoint) {
        self.record(HealthEvent::ApiServerStopped);
    }

    fn api_server_failed(&self, _endpoint: &ApiEndpoint, error: &ListenerError) {
        self.record(HealthEvent::ApiServerFailed(error.to_string()));
    }
}
