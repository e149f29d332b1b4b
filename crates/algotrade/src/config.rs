//! Application configuration.

use std::path::Path;

use algotrade_guard::GuardConfig;
use algotrade_session::{DirectoryConfig, SessionConfig};
use serde::{Deserialize, Serialize};

use crate::AlgotradeError;

/// Everything configurable, one section per crate.
///
/// Sections and fields left out of a JSON document keep their defaults, so
/// `{}` is a valid configuration.
///
/// ```json
/// {
///   "session": { "storage_key": "user", "restore_on_start": true },
///   "directory": { "latency": { "secs": 1, "nanos": 0 } },
///   "guard": { "login_path": "/login", "unauthorized_path": "/unauthorized", "home_path": "/dashboard" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlgotradeConfig {
    pub session: SessionConfig,
    pub directory: DirectoryConfig,
    pub guard: GuardConfig,
}

impl AlgotradeConfig {
    pub fn from_json_str(json: &str) -> Result<Self, AlgotradeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AlgotradeError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&raw)?;
        tracing::debug!(path = %path.as_ref().display(), "configuration loaded");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_from_json_str_empty_is_default() {
        let config = AlgotradeConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AlgotradeConfig::default());
    }

    #[test]
    fn test_from_json_str_partial_sections() {
        let config = AlgotradeConfig::from_json_str(
            r#"{"session":{"restore_on_start":false},"directory":{"latency":{"secs":0,"nanos":0}}}"#,
        )
        .unwrap();
        assert!(!config.session.restore_on_start);
        assert_eq!(config.session.storage_key, "user");
        assert_eq!(config.directory.latency, Duration::ZERO);
        assert_eq!(config.guard, GuardConfig::default());
    }

    #[test]
    fn test_from_json_str_malformed_is_config_error() {
        let err = AlgotradeConfig::from_json_str("{ session: ").unwrap_err();
        assert!(matches!(err, AlgotradeError::Config(_)));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = AlgotradeConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, AlgotradeError::Io(_)));
    }
}
