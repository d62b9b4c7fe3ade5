use crate::paths::AppDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CURRENT_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_config_version")]
    pub config_version: u32,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub trending: TrendingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_version: default_config_version(),
            logging: LoggingConfig::default(),
            catalog: CatalogConfig::default(),
            trending: TrendingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: LogLevel,
    #[serde(default = "default_max_log_files")]
    pub max_log_files: usize,
    /// Mirror log lines to stderr. Stdout is reserved for the JSON document.
    #[serde(default = "default_stderr_enabled")]
    pub stderr: bool,
    /// Enables a daily rolling log file under the data directory.
    #[serde(default)]
    pub file_name: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_log_files: default_max_log_files(),
            stderr: default_stderr_enabled(),
            file_name: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Connection settings for the remote music catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Interface language sent as `hl`.
    #[serde(default = "default_language")]
    pub language: String,
    /// Content region sent as `gl`.
    #[serde(default = "default_location")]
    pub location: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            language: default_language(),
            location: default_location(),
            user_agent: default_user_agent(),
            connect_timeout_secs: default_connect_timeout_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrendingConfig {
    /// Chart region tried before falling back to search.
    #[serde(default = "default_trending_country")]
    pub country: String,
    #[serde(default = "default_fallback_query")]
    pub fallback_query: String,
}

impl Default for TrendingConfig {
    fn default() -> Self {
        Self {
            country: default_trending_country(),
            fallback_query: default_fallback_query(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("config validation failed: {0}")]
    Validation(ValidationError),
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("unsupported config_version {found}, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("catalog.base_url must not be empty")]
    EmptyBaseUrl,
    #[error("catalog.timeout_secs must be greater than zero")]
    ZeroTimeout,
}

impl Config {
    /// Loads `config.toml` from the platform config directory, or defaults
    /// when it does not exist.
    pub fn load_or_default(dirs: &AppDirs) -> Result<Self, ConfigError> {
        let path = Self::config_path(dirs);
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Loads an explicit config file; a missing file is an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate().map_err(ConfigError::Validation)?;
        Ok(config)
    }

    pub fn config_path(dirs: &AppDirs) -> PathBuf {
        dirs.config_dir().join("config.toml")
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.config_version != CURRENT_CONFIG_VERSION {
            return Err(ValidationError::UnsupportedVersion {
                found: self.config_version,
                expected: CURRENT_CONFIG_VERSION,
            });
        }
        if self.catalog.base_url.trim().is_empty() {
            return Err(ValidationError::EmptyBaseUrl);
        }
        if self.catalog.timeout_secs == 0 {
            return Err(ValidationError::ZeroTimeout);
        }
        Ok(())
    }
}

fn default_config_version() -> u32 {
    CURRENT_CONFIG_VERSION
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_max_log_files() -> usize {
    7
}

fn default_stderr_enabled() -> bool {
    true
}

fn default_base_url() -> String {
    "https://music.youtube.com".into()
}

fn default_language() -> String {
    "en".into()
}

fn default_location() -> String {
    "IN".into()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:88.0) Gecko/20100101 Firefox/88.0".into()
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_trending_country() -> String {
    "IN".into()
}

fn default_fallback_query() -> String {
    "trending hindi songs 2024".into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.logging.max_log_files, 7);
        assert!(config.logging.stderr);
        assert_eq!(config.logging.level, LogLevel::Warn);
        assert_eq!(config.catalog.base_url, "https://music.youtube.com");
        assert_eq!(config.trending.country, "IN");
    }

    #[test]
    fn invalid_version_rejected() {
        let mut config = Config::default();
        config.config_version = CURRENT_CONFIG_VERSION + 1;
        let result = config.validate();
        assert!(matches!(
            result,
            Err(ValidationError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn zero_timeout_rejected() {
        let mut config = Config::default();
        config.catalog.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ValidationError::ZeroTimeout)));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[catalog]\nlocation = \"US\"\n\n[trending]\nfallback_query = \"top hits\"\n\n[logging]\nlevel = \"debug\""
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.catalog.location, "US");
        assert_eq!(config.catalog.language, "en");
        assert_eq!(config.trending.fallback_query, "top hits");
        assert_eq!(config.trending.country, "IN");
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "catalog = [").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn missing_explicit_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
