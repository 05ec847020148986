//! Exclusive device-control lock.

use super::session::SessionId;

/// Why a session may not mutate device state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockConflict {
    /// Nobody holds the lock.
    NotLocked,
    /// Another session holds the lock.
    Busy,
}

/// Tracks which session, if any, owns device-mutation rights.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LockManager {
    holder: Option<SessionId>,
}

impl LockManager {
    /// Current holder.
    #[must_use]
    pub const fn holder(&self) -> Option<SessionId> {
        self.holder
    }

    /// Whether any session holds the lock.
    #[must_use]
    pub const fn is_held(&self) -> bool {
        self.holder.is_some()
    }

    /// Whether `session` holds the lock.
    #[must_use]
    pub fn is_held_by(&self, session: SessionId) -> bool {
        self.holder == Some(session)
    }

    /// Takes the lock for `session`. Returns `false` when another session
    /// holds it; re-acquiring by the holder succeeds.
    pub fn acquire(&mut self, session: SessionId) -> bool {
        match self.holder {
            Some(holder) if holder != session => false,
            _ => {
                self.holder = Some(session);
                true
            }
        }
    }

    /// Releases the lock if `session` holds it. Returns whether it did.
    pub fn release(&mut self, session: SessionId) -> bool {
        if self.is_held_by(session) {
            self.holder = None;
            true
        } else {
            false
        }
    }

    /// Checks that `session` may mutate device state.
    ///
    /// # Errors
    ///
    /// Returns [`LockConflict::NotLocked`] when the lock is free and
    /// [`LockConflict::Busy`] when another session holds it.
    pub fn check_holder(&self, session: SessionId) -> Result<(), LockConflict> {
        match self.holder {
            None => Err(LockConflict::NotLocked),
            Some(holder) if holder == session => Ok(()),
            Some(_) => Err(LockConflict::Busy),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    const FIRST: SessionId = SessionId::from_raw(1);
    const SECOND: SessionId = SessionId::from_raw(2);

    #[fixture]
    fn held() -> LockManager {
        let mut lock = LockManager::default();
        assert!(lock.acquire(FIRST));
        lock
    }

    #[test]
    fn idle_lock_rejects_mutation() {
        let lock = LockManager::default();
        assert!(!lock.is_held());
        assert_eq!(lock.check_holder(FIRST), Err(LockConflict::NotLocked));
    }

    #[rstest]
    fn holder_can_reacquire(mut held: LockManager) {
        assert!(held.acquire(FIRST));
        assert_eq!(held.holder(), Some(FIRST));
    }

    #[rstest]
    fn other_session_is_refused(mut held: LockManager) {
        assert!(!held.acquire(SECOND));
        assert_eq!(held.check_holder(SECOND), Err(LockConflict::Busy));
        assert_eq!(held.check_holder(FIRST), Ok(()));
    }

    #[rstest]
    fn only_holder_releases(mut held: LockManager) {
        assert!(!held.release(SECOND));
        assert!(held.is_held());
        assert!(held.release(FIRST));
        assert!(!held.release(FIRST));
        assert!(!held.is_held());
    }
}
