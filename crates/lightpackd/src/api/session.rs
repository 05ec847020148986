//! Per-connection session state.

use std::fmt;
use std::sync::Arc;

use super::engine::ApiEngine;
use super::response::Reply;

/// Identifier unique to one connection for the lifetime of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "session-{}", self.0)
    }
}

/// Authentication state of one connection.
///
/// Lock ownership is not stored here; it is derived from the engine's
/// [`LockManager`](super::LockManager) so the two can never disagree.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    authenticated: bool,
}

impl Session {
    pub(crate) const fn new(id: SessionId) -> Self {
        Self {
            id,
            authenticated: false,
        }
    }

    /// Session identifier.
    #[must_use]
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// Whether the last `apikey` presented by this session matched.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub(crate) fn set_authenticated(&mut self, authenticated: bool) {
        self.authenticated = authenticated;
    }
}

/// Live session bound to an engine.
///
/// Dropping the guard ends the session and releases any lock it holds, so a
/// connection that fails mid-stream cannot leave the device locked.
pub struct SessionGuard {
    engine: Arc<ApiEngine>,
    session: Session,
}

impl SessionGuard {
    pub(crate) fn new(engine: Arc<ApiEngine>, session: Session) -> Self {
        Self { engine, session }
    }

    /// Session state.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Executes one request line on behalf of this session.
    pub fn execute(&mut self, line: &str) -> Reply {
        self.engine.execute(&mut self.session, line)
    }
}

impl fmt::Debug for SessionGuard {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SessionGuard")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.engine.end_session(self.session.id());
    }
}
