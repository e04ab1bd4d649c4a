//! Configuration loading and typed config structures for the career log.
//!
//! The configuration lives in a YAML file (by convention
//! `careerlog-config.yaml`). This module defines strongly-typed structs that
//! mirror the YAML structure and a loader that reads and validates it.
//!
//! ```yaml
//! career_log:
//!   enabled: true
//!   log_period_months: 1
//! export:
//!   server_url: "https://example.org/careers"
//!   token: "abc123"
//!   career_id: "my-career"
//!   csv_path: "career_log.csv"
//! logging:
//!   level: info
//! ```

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but holds an unusable value.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level career log configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CareerLogConfig {
    /// Bookkeeping settings.
    #[serde(default)]
    pub career_log: CareerLogSettings,

    /// Export destinations.
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CareerLogConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values for the export section:
    /// - `CAREERLOG_SERVER_URL` overrides `export.server_url`
    /// - `CAREERLOG_TOKEN` overrides `export.token`
    /// - `CAREERLOG_CAREER_ID` overrides `export.career_id`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.export.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// Environment overrides are not applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.career_log.log_period_months == 0 {
            return Err(ConfigError::Invalid {
                reason: "career_log.log_period_months must be at least 1".to_owned(),
            });
        }
        Ok(())
    }
}

/// Settings that drive event bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CareerLogSettings {
    /// Whether events are recorded at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Number of calendar months covered by one period.
    #[serde(default = "default_log_period_months")]
    pub log_period_months: u32,
}

impl Default for CareerLogSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            log_period_months: default_log_period_months(),
        }
    }
}

/// Export destinations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExportConfig {
    /// Base URL of the career log server. Empty disables upload.
    #[serde(default)]
    pub server_url: String,

    /// Per-career access token appended to the server URL.
    #[serde(default)]
    pub token: String,

    /// Identifier sent as `careerUuid` with every period.
    #[serde(default)]
    pub career_id: String,

    /// Default destination for CSV export.
    #[serde(default = "default_csv_path")]
    pub csv_path: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            server_url: String::new(),
            token: String::new(),
            career_id: String::new(),
            csv_path: default_csv_path(),
        }
    }
}

impl ExportConfig {
    /// Override export values with environment variables when set.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Override export values from an arbitrary key lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("CAREERLOG_SERVER_URL") {
            self.server_url = val;
        }
        if let Some(val) = lookup("CAREERLOG_TOKEN") {
            self.token = val;
        }
        if let Some(val) = lookup("CAREERLOG_CAREER_ID") {
            self.career_id = val;
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG`
    /// is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

const fn default_true() -> bool {
    true
}

const fn default_log_period_months() -> u32 {
    1
}

fn default_csv_path() -> String {
    "career_log.csv".to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = CareerLogConfig::default();
        assert!(config.career_log.enabled);
        assert_eq!(config.career_log.log_period_months, 1);
        assert_eq!(config.export.csv_path, "career_log.csv");
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
career_log:
  enabled: false
  log_period_months: 3
export:
  server_url: "https://example.org/careers/"
  token: "tok"
  career_id: "career-1"
  csv_path: "out.csv"
logging:
  level: debug
"#;
        let config = CareerLogConfig::parse(yaml).unwrap();
        assert!(!config.career_log.enabled);
        assert_eq!(config.career_log.log_period_months, 3);
        assert_eq!(config.export.server_url, "https://example.org/careers/");
        assert_eq!(config.export.token, "tok");
        assert_eq!(config.export.career_id, "career-1");
        assert_eq!(config.export.csv_path, "out.csv");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn partial_yaml_uses_defaults() {
        let config = CareerLogConfig::parse("export:\n  token: abc\n").unwrap();
        assert!(config.career_log.enabled);
        assert_eq!(config.career_log.log_period_months, 1);
        assert_eq!(config.export.token, "abc");
        assert!(config.export.server_url.is_empty());
    }

    #[test]
    fn zero_month_period_is_rejected() {
        let result = CareerLogConfig::parse("career_log:\n  log_period_months: 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn malformed_yaml_is_rejected() {
        let result = CareerLogConfig::parse("career_log: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn from_file_reads_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("careerlog-config.yaml");
        std::fs::write(&path, "career_log:\n  log_period_months: 2\n").unwrap();
        let config = CareerLogConfig::from_file(&path).unwrap();
        assert_eq!(config.career_log.log_period_months, 2);
        assert_eq!(config.export.csv_path, "career_log.csv");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = CareerLogConfig::from_file(&dir.path().join("absent.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn overrides_replace_export_values() {
        let mut export = ExportConfig::default();
        export.apply_overrides(|key| match key {
            "CAREERLOG_TOKEN" => Some("from-env".to_owned()),
            _ => None,
        });
        assert_eq!(export.token, "from-env");
        assert!(export.server_url.is_empty());
    }
}
