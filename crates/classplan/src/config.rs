/// Process configuration
use crate::engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "classplan.json";

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// SQLite database holding catalog and rating snapshots
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default)]
    pub engine: EngineConfig,
}

fn default_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_database_path() -> String {
    "classplan.db".to_string()
}

fn default_cache_ttl_secs() -> u64 {
    5 * 60
}

impl AppConfig {
    /// Loads configuration from a JSON file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(AppConfig)` - Parsed configuration, or defaults if the file does not exist
    /// * `Err` - If the file can't be read or parsed
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_str(&content)?)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
            database_path: default_database_path(),
            cache_ttl_secs: default_cache_ttl_secs(),
            engine: EngineConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::UnknownRatingPolicy;

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = AppConfig::load(Path::new("/nonexistent/classplan.json")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_partial_json() {
        let config: AppConfig = serde_json::from_str(
            r#"{"port": 9000, "engine": {"top_k": 3, "unknown_rating": {"policy": "ignore"}}}"#,
        )
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.database_path, "classplan.db");
        assert_eq!(config.engine.top_k, 3);
        assert_eq!(config.engine.unknown_rating, UnknownRatingPolicy::Ignore);
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_malformed_file_is_error() {
        let path = std::env::temp_dir().join(format!("classplan-{}.json", std::process::id()));
        fs::write(&path, "{ port: ").unwrap();
        let result = AppConfig::load(&path);
        fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }
}
