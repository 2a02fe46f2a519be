use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "ER Compass";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable overriding the triage backend base URL.
pub const API_BASE_URL_ENV: &str = "ER_COMPASS_API_URL";

/// Backend used when `ER_COMPASS_API_URL` is unset (local dev proxy).
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Environment variables providing the platform position fix.
pub const POSITION_LAT_ENV: &str = "ER_COMPASS_LAT";
pub const POSITION_LON_ENV: &str = "ER_COMPASS_LON";

/// Bounded wait for a single geolocation read.
pub const GEO_FIX_TIMEOUT: Duration = Duration::from_secs(10);

/// A cached position fix may be reused for up to one minute.
pub const GEO_FIX_MAX_AGE: Duration = Duration::from_secs(60);

/// Connect timeout for the triage backend. The two lookups themselves
/// carry no request timeout — a hung request keeps the loading indicator
/// up indefinitely (known gap, matches the contract).
pub const API_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Get the triage backend base URL, without a trailing slash.
pub fn api_base_url() -> String {
    std::env::var(API_BASE_URL_ENV)
        .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string())
        .trim_end_matches('/')
        .to_string()
}

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    "info,er_compass=debug".to_string()
}
