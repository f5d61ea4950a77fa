use std::path::PathBuf;

use shared::order::DEFAULT_ESTIMATED_MINUTES;

/// Server configuration
///
/// # Environment variables
///
/// Every value can be overridden from the environment (or a `.env` file):
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./work_dir | database and log root |
/// | HTTP_PORT | 3000 | HTTP API port |
/// | ENVIRONMENT | development | development / production |
/// | LOG_LEVEL | info | default log filter |
/// | LOG_JSON | false (true in production) | JSON log output |
/// | DEFAULT_ETA_MINUTES | 25 | tracker ETA when nothing is set |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/dine HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Holds `orders.redb` and `logs/`
    pub work_dir: String,
    pub http_port: u16,
    /// development | production
    pub environment: String,
    pub log_level: String,
    pub log_json: bool,
    pub default_eta_minutes: i32,
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let environment =
            std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let production = environment == "production";

        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./work_dir".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: std::env::var("LOG_JSON")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(production),
            default_eta_minutes: std::env::var("DEFAULT_ETA_MINUTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|m: &i32| *m > 0)
                .unwrap_or(DEFAULT_ESTIMATED_MINUTES),
        }
    }

    /// Override the work directory and port
    ///
    /// Mostly used by tests.
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// Order Ledger database file
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("orders.redb")
    }

    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_follow_work_dir() {
        let config = Config::with_overrides("/tmp/dine-test", 8088);
        assert_eq!(config.http_port, 8088);
        assert_eq!(config.db_path(), PathBuf::from("/tmp/dine-test/orders.redb"));
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/dine-test/logs"));
        assert!(config.default_eta_minutes > 0);
    }
}
