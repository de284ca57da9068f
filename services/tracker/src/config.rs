//! services/tracker/src/config.rs
//!
//! Defines the tracker's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub session_file: PathBuf,
    pub log_level: Level,
    pub openai_api_key: Option<String>,
    pub openai_api_base: Option<String>,
    pub analysis_model: String,
    pub plan_model: String,
    pub ai_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:study_os.db?mode=rwc".to_string(),
            session_file: PathBuf::from("./.study_os_session"),
            log_level: Level::INFO,
            openai_api_key: None,
            openai_api_base: None,
            analysis_model: "gpt-4o-mini".to_string(),
            plan_model: "gpt-4o".to_string(),
            ai_timeout: Duration::from_secs(30),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Unset keys take
    /// the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        // --- Storage ---
        let database_url = lookup("DATABASE_URL").unwrap_or(defaults.database_url);
        let session_file = lookup("SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.session_file);

        let log_level = match lookup("RUST_LOG") {
            Some(value) => value.parse::<Level>().map_err(|_| {
                ConfigError::InvalidValue(
                    "RUST_LOG".to_string(),
                    format!("'{}' is not a valid log level", value),
                )
            })?,
            None => defaults.log_level,
        };

        // --- AI endpoint (optional) ---
        let openai_api_key = lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty());
        let openai_api_base = lookup("OPENAI_API_BASE").filter(|b| !b.trim().is_empty());
        let analysis_model = lookup("ANALYSIS_MODEL").unwrap_or(defaults.analysis_model);
        let plan_model = lookup("PLAN_MODEL").unwrap_or(defaults.plan_model);

        let ai_timeout = match lookup("AI_TIMEOUT_SECS") {
            Some(value) => {
                let secs = value.parse::<u64>().map_err(|e| {
                    ConfigError::InvalidValue("AI_TIMEOUT_SECS".to_string(), e.to_string())
                })?;
                if secs == 0 {
                    return Err(ConfigError::InvalidValue(
                        "AI_TIMEOUT_SECS".to_string(),
                        "must be greater than zero".to_string(),
                    ));
                }
                Duration::from_secs(secs)
            }
            None => defaults.ai_timeout,
        };

        Ok(Self {
            database_url,
            session_file,
            log_level,
            openai_api_key,
            openai_api_base,
            analysis_model,
            plan_model,
            ai_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.database_url, "sqlite:study_os.db?mode=rwc");
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.ai_timeout, Duration::from_secs(30));
        assert!(config.openai_api_key.is_none());
    }

    #[test]
    fn test_reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("RUST_LOG", "debug"),
            ("OPENAI_API_KEY", "sk-test"),
            ("AI_TIMEOUT_SECS", "5"),
            ("PLAN_MODEL", "gpt-4.1"),
        ]))
        .unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.ai_timeout, Duration::from_secs(5));
        assert_eq!(config.plan_model, "gpt-4.1");
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = Config::from_lookup(lookup(&[("RUST_LOG", "chatty")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref var, _) if var == "RUST_LOG"));

        let err = Config::from_lookup(lookup(&[("AI_TIMEOUT_SECS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref var, _) if var == "AI_TIMEOUT_SECS"));
    }
}
