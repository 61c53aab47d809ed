use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::SchemaFailurePolicy;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const BACKEND_URL_ENV: &str = "NLQ_BACKEND_URL";
pub const CONFIG_DIR_ENV: &str = "NLQ_CONFIG_DIR";

const CONFIG_FILE_NAME: &str = "config.toml";
const LOG_FILE_NAME: &str = "nlq.log";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub backend_url: String,
    pub schema_failure_policy: SchemaFailurePolicy,
    pub request_timeout_secs: Option<u64>,
    pub log: LogSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            schema_failure_policy: SchemaFailurePolicy::Silent,
            request_timeout_secs: None,
            log: LogSettings::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config directory is unavailable for this platform")]
    ConfigDirUnavailable,
    #[error("failed to read config file at {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("backend url `{0}` must start with http:// or https://")]
    InvalidBackendUrl(String),
}

impl AppConfig {
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = default_config_path()?;
        let mut config = Self::load_from_path(&path)?;
        config.apply_overrides(|key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        if raw.trim().is_empty() {
            return Ok(Self::default());
        }

        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies environment overrides through `lookup` so callers control the source.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(BACKEND_URL_ENV).filter(|url| !url.trim().is_empty()) {
            self.backend_url = url;
        }
    }

    pub fn validate(&mut self) -> Result<(), ConfigError> {
        let trimmed = self.backend_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ConfigError::InvalidBackendUrl(self.backend_url.clone()));
        }
        self.backend_url = trimmed.to_string();
        Ok(())
    }

    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn log_file_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.log.file {
            Some(path) => Ok(path.clone()),
            None => Ok(default_config_dir()?.join(LOG_FILE_NAME)),
        }
    }
}

pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    if let Some(custom) = env::var_os(CONFIG_DIR_ENV) {
        return Ok(PathBuf::from(custom));
    }

    let base_dir = if cfg!(target_os = "windows") {
        env::var_os("APPDATA")
            .map(PathBuf::from)
            .ok_or(ConfigError::ConfigDirUnavailable)?
    } else if let Some(xdg_config_home) = env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(xdg_config_home)
    } else {
        let home = env::var_os("HOME").ok_or(ConfigError::ConfigDirUnavailable)?;
        PathBuf::from(home).join(".config")
    };

    Ok(base_dir.join("nlq"))
}

pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    Ok(default_config_dir()?.join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::Duration;

    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, BACKEND_URL_ENV, DEFAULT_BACKEND_URL};
    use crate::state::SchemaFailurePolicy;

    #[test]
    fn missing_and_blank_files_yield_defaults() {
        let temp_dir = TempDir::new().expect("failed to create temp directory");
        let path = temp_dir.path().join("config.toml");

        let config = AppConfig::load_from_path(&path).expect("missing file should load");
        assert_eq!(config, AppConfig::default());

        fs::write(&path, "  \n").expect("failed to write config");
        let config = AppConfig::load_from_path(&path).expect("blank file should load");
        assert_eq!(config.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(config.schema_failure_policy, SchemaFailurePolicy::Silent);
        assert!(config.request_timeout().is_none());
    }

    #[test]
    fn parses_all_keys() {
        let temp_dir = TempDir::new().expect("failed to create temp directory");
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
backend_url = "https://graph.example.test/"
schema_failure_policy = "surface"
request_timeout_secs = 30

[log]
level = "debug"
file = "/tmp/nlq-test.log"
"#,
        )
        .expect("failed to write config");

        let mut config = AppConfig::load_from_path(&path).expect("config should load");
        config.validate().expect("config should validate");

        assert_eq!(config.backend_url, "https://graph.example.test");
        assert_eq!(config.schema_failure_policy, SchemaFailurePolicy::Surface);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(config.log.level, "debug");
        assert_eq!(
            config.log_file_path().expect("log path should resolve"),
            PathBuf::from("/tmp/nlq-test.log")
        );
    }

    #[test]
    fn malformed_file_reports_parse_error() {
        let temp_dir = TempDir::new().expect("failed to create temp directory");
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "schema_failure_policy = \"loud\"").expect("failed to write config");

        let error = AppConfig::load_from_path(&path).expect_err("unknown policy should fail");
        assert!(matches!(error, ConfigError::Parse { .. }));
    }

    #[test]
    fn environment_override_wins_over_file_value() {
        let mut config = AppConfig {
            backend_url: "http://from-file:8000".to_string(),
            ..AppConfig::default()
        };

        config.apply_overrides(|key| {
            (key == BACKEND_URL_ENV).then(|| "http://from-env:9000".to_string())
        });
        assert_eq!(config.backend_url, "http://from-env:9000");

        config.apply_overrides(|_| Some("   ".to_string()));
        assert_eq!(config.backend_url, "http://from-env:9000");
    }

    #[test]
    fn rejects_backend_url_without_http_scheme() {
        let mut config = AppConfig {
            backend_url: "localhost:8000".to_string(),
            ..AppConfig::default()
        };

        let error = config.validate().expect_err("scheme-less url should fail");
        assert!(matches!(error, ConfigError::InvalidBackendUrl(url) if url == "localhost:8000"));
    }
}
