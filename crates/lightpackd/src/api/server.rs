//! Runtime owner of the API listener.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use lightpack_config::{ApiEndpoint, Config};

use crate::health::HealthReporter;
use crate::transport::{ApiListener, ListenerError, ListenerHandle};

use super::API_TARGET;
use super::engine::ApiEngine;
use super::errors::ApiError;
use super::handler::ApiConnectionHandler;

/// Remote-control server: an [`ApiEngine`] plus the listener feeding it.
///
/// Runtime setters mirror the controls the owning process exposes. Changes
/// apply to subsequent connections and commands; live sessions are never
/// disconnected.
pub struct ApiServer {
    engine: Arc<ApiEngine>,
    endpoint: ApiEndpoint,
    enabled: bool,
    listener: Option<ListenerHandle>,
    reporter: Arc<dyn HealthReporter>,
}

impl ApiServer {
    /// Builds a stopped server.
    #[must_use]
    pub fn new(
        engine: Arc<ApiEngine>,
        endpoint: ApiEndpoint,
        reporter: Arc<dyn HealthReporter>,
    ) -> Self {
        Self {
            engine,
            endpoint,
            enabled: true,
            listener: None,
            reporter,
        }
    }

    /// Builds a stopped server using the configured endpoint and enablement.
    #[must_use]
    pub fn from_config(
        config: &Config,
        engine: Arc<ApiEngine>,
        reporter: Arc<dyn HealthReporter>,
    ) -> Self {
        let mut server = Self::new(engine, config.api_endpoint(), reporter);
        server.enabled = config.api_enabled;
        server
    }

    /// Shared engine.
    #[must_use]
    pub fn engine(&self) -> &Arc<ApiEngine> {
        &self.engine
    }

    /// Configured endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &ApiEndpoint {
        &self.endpoint
    }

    /// Whether the server should be listening.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the listener is running.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.listener.is_some()
    }

    /// Bound address while running.
    #[must_use]
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref().map(ListenerHandle::local_addr)
    }

    /// Starts listening if enabled and not already running.
    ///
    /// # Errors
    ///
    /// Returns a [`ListenerError`] when binding fails. The failure is also
    /// reported through [`HealthReporter::api_server_failed`].
    pub fn start(&mut self) -> Result<(), ListenerError> {
        if !self.enabled || self.listener.is_some() {
            return Ok(());
        }

        let handler = Arc::new(ApiConnectionHandler::new(Arc::clone(&self.engine)));
        match ApiListener::bind(&self.endpoint).and_then(|listener| listener.start(handler)) {
            Ok(handle) => {
                self.reporter
                    .api_server_started(&self.endpoint, handle.local_addr());
                self.listener = Some(handle);
                Ok(())
            }
            Err(error) => {
                self.reporter.api_server_failed(&self.endpoint, &error);
                Err(error)
            }
        }
    }

    /// Stops accepting connections. Sessions already connected continue.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::ThreadPanic`] if the accept thread panicked.
    pub fn stop(&mut self) -> Result<(), ListenerError> {
        let Some(handle) = self.listener.take() else {
            return Ok(());
        };
        handle.shutdown();
        let result = handle.join();
        self.reporter.api_server_stopped(&self.endpoint);
        result
    }

    /// Enables or disables the listener.
    ///
    /// # Errors
    ///
    /// Returns a [`ListenerError`] when enabling fails to bind.
    pub fn set_enabled(&mut self, enabled: bool) -> Result<(), ListenerError> {
        info!(target: API_TARGET, enabled, "API server enablement updated");
        self.enabled = enabled;
        if enabled { self.start() } else { self.stop() }
    }

    /// Moves the listener to `port`. An enabled server listens there
    /// afterwards, including one left stopped by an earlier failed bind.
    ///
    /// # Errors
    ///
    /// Returns a [`ListenerError`] when the new port cannot be bound. The
    /// server is left stopped in that case.
    pub fn set_listen_port(&mut self, port: u16) -> Result<(), ListenerError> {
        if port == self.endpoint.port && self.is_running() {
            return Ok(());
        }
        info!(target: API_TARGET, port, "API listen port updated");
        self.endpoint = self.endpoint.with_port(port);
        self.stop()?;
        self.start()
    }

    /// Enables or disables key authorization.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] if the engine state is poisoned.
    pub fn set_auth_enabled(&self, enabled: bool) -> Result<(), ApiError> {
        self.engine.set_auth_enabled(enabled)
    }

    /// Replaces the API key.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] if the engine state is poisoned.
    pub fn set_api_key(&self, key: &str) -> Result<(), ApiError> {
        self.engine.set_api_key(key)
    }
}

impl Drop for ApiServer {
    fn drop(&mut self) {
        if let Some(handle) = self.listener.take() {
            handle.shutdown();
        }
    }
}
