//! Shared protocol engine.
//!
//! The engine owns the device state, the lock and the authorization settings
//! behind one mutex. Each request runs the same pipeline: the grammar parses
//! the line, the authorization gate checks gated commands, the lock manager
//! checks mutations, and only then is state changed and the lighting sink
//! notified. Nothing is changed when any stage rejects the request.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info, warn};

use lightpack_config::Config;

use crate::device::{
    DeviceState, LightingSink, MemoryProfileStore, ProfileStore, SharedStatus, StatusSource,
    TracingLightingSink, correct,
};

use super::API_TARGET;
use super::auth::ApiAccess;
use super::command::{Command, CommandError, Mutation, Query};
use super::errors::ApiError;
use super::lock::{LockConflict, LockManager};
use super::response::Reply;
use super::session::{Session, SessionGuard, SessionId};

/// External systems the engine reads from and writes to.
#[derive(Clone)]
pub struct Collaborators {
    /// Profile catalogue and active profile.
    pub profiles: Arc<dyn ProfileStore>,
    /// Receiver of validated lighting values.
    pub sink: Arc<dyn LightingSink>,
    /// Live backlight status.
    pub status: Arc<dyn StatusSource>,
}

impl Collaborators {
    /// In-process collaborators used when no lighting pipeline is attached.
    ///
    /// `setstatus` changes are mirrored back to `getstatus`.
    #[must_use]
    pub fn in_memory(profile: &str) -> Self {
        let status = Arc::new(SharedStatus::default());
        Self {
            profiles: Arc::new(MemoryProfileStore::single(profile)),
            sink: Arc::new(TracingLightingSink::new(Arc::clone(&status))),
            status,
        }
    }
}

#[derive(Debug)]
struct SharedState {
    device: DeviceState,
    lock: LockManager,
    access: ApiAccess,
}

/// Protocol engine shared by every connection.
pub struct ApiEngine {
    state: Mutex<SharedState>,
    collaborators: Collaborators,
    led_count: usize,
    next_session: AtomicU64,
}

impl ApiEngine {
    /// Builds an engine for `led_count` LEDs.
    #[must_use]
    pub fn new(led_count: usize, access: ApiAccess, collaborators: Collaborators) -> Self {
        let device = DeviceState::new(led_count, collaborators.profiles.current_profile());
        Self {
            state: Mutex::new(SharedState {
                device,
                lock: LockManager::default(),
                access,
            }),
            collaborators,
            led_count,
            next_session: AtomicU64::new(1),
        }
    }

    /// Builds an engine from the resolved configuration.
    #[must_use]
    pub fn from_config(config: &Config, collaborators: Collaborators) -> Self {
        Self::new(
            config.led_count(),
            ApiAccess::from_config(config),
            collaborators,
        )
    }

    /// Number of addressable LEDs.
    #[must_use]
    pub const fn led_count(&self) -> usize {
        self.led_count
    }

    /// Starts a session. The lock it may acquire is released when the
    /// returned guard is dropped.
    #[must_use]
    pub fn open_session(self: &Arc<Self>) -> SessionGuard {
        let id = SessionId::from_raw(self.next_session.fetch_add(1, Ordering::Relaxed));
        debug!(target: API_TARGET, session = %id, "session opened");
        SessionGuard::new(Arc::clone(self), Session::new(id))
    }

    /// Executes one request line for `session` and returns its reply.
    pub fn execute(&self, session: &mut Session, line: &str) -> Reply {
        let command = match Command::parse(line, self.led_count) {
            Ok(command) => command,
            Err(error) => {
                debug!(
                    target: API_TARGET,
                    session = %session.id(),
                    %error,
                    "request rejected"
                );
                return match error {
                    CommandError::Unknown { .. } => Reply::UnknownCommand,
                    CommandError::InvalidPayload { .. } => Reply::Error,
                };
            }
        };

        let id = session.id();
        debug!(
            target: API_TARGET,
            session = %id,
            command = command.keyword(),
            "executing request"
        );

        self.with_state(|state| self.dispatch(state, session, command))
            .unwrap_or_else(|error| {
                warn!(target: API_TARGET, session = %id, %error, "request failed");
                Reply::Error
            })
    }

    /// Ends a session, releasing the lock if it holds it.
    ///
    /// A poisoned state mutex is recovered here: a dead session must never
    /// keep the device locked.
    pub(crate) fn end_session(&self, id: SessionId) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.lock.release(id) {
            info!(
                target: API_TARGET,
                session = %id,
                "lock released on disconnect"
            );
        }
        debug!(target: API_TARGET, session = %id, "session closed");
    }

    /// Snapshot of the device state.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] if the state lock is poisoned.
    pub fn device_state(&self) -> Result<DeviceState, ApiError> {
        self.with_state(|state| state.device.clone())
    }

    /// Session currently holding the lock.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] if the state lock is poisoned.
    pub fn lock_holder(&self) -> Result<Option<SessionId>, ApiError> {
        self.with_state(|state| state.lock.holder())
    }

    /// Current authorization settings.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] if the state lock is poisoned.
    pub fn access(&self) -> Result<ApiAccess, ApiError> {
        self.with_state(|state| state.access.clone())
    }

    /// Enables or disables key authorization for subsequent commands.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] if the state lock is poisoned.
    pub fn set_auth_enabled(&self, enabled: bool) -> Result<(), ApiError> {
        self.with_state(|state| state.access.set_auth_enabled(enabled))?;
        info!(target: API_TARGET, enabled, "API authorization updated");
        Ok(())
    }

    /// Replaces the API key for subsequent `apikey` commands.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Internal`] if the state lock is poisoned.
    pub fn set_api_key(&self, key: &str) -> Result<(), ApiError> {
        self.with_state(|state| state.access.set_api_key(key))?;
        info!(target: API_TARGET, "API key updated");
        Ok(())
    }

    fn with_state<F, R>(&self, f: F) -> Result<R, ApiError>
    where
        F: FnOnce(&mut SharedState) -> R,
    {
        let mut guard = self
            .state
            .lock()
            .map_err(|_| ApiError::internal("API state lock poisoned"))?;
        Ok(f(&mut guard))
    }

    fn answer(&self, state: &SharedState, query: Query) -> Reply {
        match query {
            Query::Status => Reply::Status(self.collaborators.status.current_status()),
            Query::StatusApi => Reply::StatusApi {
                busy: state.lock.is_held(),
            },
            Query::Profiles => Reply::Profiles(self.collaborators.profiles.profiles()),
            Query::Profile => Reply::Profile(self.collaborators.profiles.current_profile()),
        }
    }

    fn dispatch(&self, state: &mut SharedState, session: &mut Session, command: Command) -> Reply {
        let id = session.id();
        if command.requires_authorization() && !state.access.is_authorized(session) {
            return Reply::AuthorizationRequired;
        }

        match command {
            Command::Query(query) => self.answer(state, query),
            Command::ApiKey(key) => {
                let accepted = state.access.verify_key(&key);
                session.set_authenticated(accepted);
                if accepted {
                    info!(target: API_TARGET, session = %id, "session authenticated");
                    Reply::Ok
                } else {
                    warn!(target: API_TARGET, session = %id, "API key rejected");
                    Reply::Fail
                }
            }
            Command::Lock => {
                if state.lock.acquire(id) {
                    info!(target: API_TARGET, session = %id, "lock acquired");
                    Reply::LockSuccess
                } else {
                    Reply::LockBusy
                }
            }
            Command::Unlock => {
                if state.lock.release(id) {
                    info!(target: API_TARGET, session = %id, "lock released");
                    Reply::UnlockSuccess
                } else {
                    Reply::UnlockNotLocked
                }
            }
            Command::Mutation(mutation) => match state.lock.check_holder(id) {
                Ok(()) => {
                    self.apply(&mut state.device, mutation);
                    Reply::Ok
                }
                Err(LockConflict::NotLocked) => Reply::NotLocked,
                Err(LockConflict::Busy) => Reply::Busy,
            },
        }
    }

    fn apply(&self, device: &mut DeviceState, mutation: Mutation) {
        let sink = &self.collaborators.sink;
        match mutation {
            Mutation::SetColor(entries) => {
                let gamma = device.gamma();
                device.set_colors(
                    entries
                        .into_iter()
                        .map(|entry| (entry.index, correct(entry.color, gamma))),
                );
                sink.apply_colors(device.led_colors());
            }
            Mutation::SetGamma(gamma) => {
                device.set_gamma(gamma);
                sink.apply_gamma(gamma);
            }
            Mutation::SetSmooth(smooth) => {
                device.set_smooth(smooth);
                sink.apply_smooth(smooth);
            }
            Mutation::SetBrightness(brightness) => {
                device.set_brightness(brightness);
                sink.apply_brightness(brightness);
            }
            Mutation::SetProfile(name) => {
                device.set_current_profile(&name);
                self.collaborators.profiles.activate(&name);
            }
            Mutation::SetStatus(status) => {
                device.set_status(status);
                sink.apply_status(status);
            }
        }
    }
}
