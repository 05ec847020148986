use crate::endpoint::ApiEndpoint;

/// Default TCP port of the remote-control API.
pub const DEFAULT_API_PORT: u16 = 3636;

/// Default interface the remote-control API binds to.
pub const DEFAULT_API_HOST: &str = "127.0.0.1";

/// Number of LEDs driven by a stock device.
pub const DEFAULT_LED_COUNT: usize = 10;

/// Upper bound on the configurable LED count.
pub const MAX_LED_COUNT: usize = 256;

/// Profile reported as active when nothing else has been selected.
pub const DEFAULT_PROFILE: &str = "Lightpack";

/// Default log filter expression used by the daemon.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default interface the remote-control API binds to.
pub fn default_api_host() -> String {
    DEFAULT_API_HOST.to_owned()
}

/// Owned default profile name.
pub fn default_profile() -> String {
    DEFAULT_PROFILE.to_owned()
}

/// Default log filter expression used by the daemon.
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the daemon.
pub fn default_log_format() -> crate::logging::LogFormat {
    crate::logging::LogFormat::Json
}

/// Endpoint the API listens on when nothing overrides host or port.
pub fn default_api_endpoint() -> ApiEndpoint {
    ApiEndpoint::new(DEFAULT_API_HOST, DEFAULT_API_PORT)
}
