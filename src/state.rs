//! Client configuration, read once at startup.

#[derive(Clone)]
pub struct Config {
    /// Base path of the analysis API, without trailing slash.
    pub api_base: String,
    /// Directory rendered result pages are written to.
    pub out_dir: String,
    pub request_timeout_secs: u64,
    pub health_timeout_secs: u64,
    /// Seconds a notice stays visible before auto-expiry.
    pub alert_ttl_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_base: std::env::var("API_BASE")
                .unwrap_or_else(|_| "http://localhost:5000/api".to_string()),
            out_dir: std::env::var("OUT_DIR").unwrap_or_else(|_| "./out".to_string()),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(120),
            health_timeout_secs: std::env::var("HEALTH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            alert_ttl_secs: std::env::var("ALERT_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
        }
    }
}
