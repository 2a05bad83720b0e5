use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-wide settings for the status service, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Budget for one request attempt. Re-armed on every redirect hop.
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_redirects: u8,
    /// Base URL of the activity-meter endpoint; the venue key is appended.
    pub activity_base_url: String,
    pub rate_limit_per_minute: usize,
}
