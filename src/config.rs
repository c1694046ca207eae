use std::path::PathBuf;

/// Runtime configuration, derived from the environment with defaults.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Directory holding the JSON snapshot files of the stores.
    pub data_dir: PathBuf,
    /// Credentials for the bootstrapped admin account. Only used when the
    /// admin directory is empty.
    pub admin_username: String,
    pub admin_password: String,
    pub session_ttl_secs: u64,
    /// Number of winners per draw. Policy, never user input.
    pub winner_count: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            data_dir: std::env::var("DATA_DIR")
                .unwrap_or_else(|_| "./data".to_string())
                .into(),
            admin_username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
            admin_password: std::env::var("ADMIN_PASSWORD")
                .unwrap_or_else(|_| "admin123".to_string()),
            session_ttl_secs: std::env::var("SESSION_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
            winner_count: std::env::var("WINNER_COUNT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
        }
    }
}
