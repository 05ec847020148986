//! API-key authorization gate.

use lightpack_config::Config;

use super::session::Session;

/// Authorization settings consulted on every gated command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiAccess {
    auth_enabled: bool,
    api_key: String,
}

impl ApiAccess {
    /// Builds access settings.
    #[must_use]
    pub fn new(auth_enabled: bool, api_key: impl Into<String>) -> Self {
        Self {
            auth_enabled,
            api_key: api_key.into(),
        }
    }

    /// Reads the configured authorization settings.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_auth_enabled, config.api_key.clone())
    }

    /// Whether a key is required.
    #[must_use]
    pub const fn auth_enabled(&self) -> bool {
        self.auth_enabled
    }

    /// Whether `session` may issue `lock` and mutating commands.
    #[must_use]
    pub const fn is_authorized(&self, session: &Session) -> bool {
        !self.auth_enabled || session.is_authenticated()
    }

    /// Exact comparison against the configured key.
    #[must_use]
    pub fn verify_key(&self, key: &str) -> bool {
        key == self.api_key
    }

    pub(crate) fn set_auth_enabled(&mut self, enabled: bool) {
        self.auth_enabled = enabled;
    }

    pub(crate) fn set_api_key(&mut self, key: &str) {
        key.clone_into(&mut self.api_key);
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::super::session::SessionId;
    use super::*;

    fn session(authenticated: bool) -> Session {
        let mut session = Session::new(SessionId::from_raw(7));
        session.set_authenticated(authenticated);
        session
    }

    #[rstest]
    #[case(false, false, true)]
    #[case(false, true, true)]
    #[case(true, false, false)]
    #[case(true, true, true)]
    fn gate_truth_table(
        #[case] auth_enabled: bool,
        #[case] authenticated: bool,
        #[case] authorized: bool,
    ) {
        let access = ApiAccess::new(auth_enabled, "key");
        assert_eq!(access.is_authorized(&session(authenticated)), authorized);
    }

    #[rstest]
    #[case("test-key", true)]
    #[case("test-keyinvalid", false)]
    #[case("TEST-KEY", false)]
    #[case("", false)]
    fn keys_compare_exactly(#[case] key: &str, #[case] accepted: bool) {
        let access = ApiAccess::new(true, "test-key");
        assert_eq!(access.verify_key(key), accepted);
    }

    #[test]
    fn runtime_updates_take_effect() {
        let mut access = ApiAccess::from_config(&Config::default());
        assert!(!access.auth_enabled());
        access.set_auth_enabled(true);
        access.set_api_key("fresh");
        assert!(access.verify_key("fresh"));
        assert!(!access.is_authorized(&session(false)));
    }
}
