//! TOML configuration schema types for SmartGlance.
//!
//! All structs derive `Deserialize` and `Serialize` with sensible defaults
//! via `#[serde(default)]`. Duration fields use human-readable strings
//! (e.g. `"1s"`, `"250ms"`) parsed by the `humantime` crate.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;

/// Root configuration encompassing all sections.
///
/// Corresponds to the full TOML file structure:
/// ```toml
/// [sync]
/// [logging]
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Persistence synchronizer settings.
    pub sync: SyncConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Persistence backend selection.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// JSON documents on the local filesystem (default).
    File,
    /// In-process store, useful for development and tests.
    Memory,
}

/// `[sync]` section.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SyncConfig {
    /// Which backend to persist to.
    pub backend: BackendKind,
    /// Debounce window for outbound writes as a human-readable duration
    /// (e.g. `"1s"`, `"500ms"`).
    pub debounce: String,
    /// Root directory for the file backend. Empty string means the
    /// platform data directory.
    pub data_dir: String,
    /// User id whose dashboard this instance syncs.
    pub user_id: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::File,
            debounce: "1s".to_string(),
            data_dir: String::new(),
            user_id: "local".to_string(),
        }
    }
}

impl SyncConfig {
    /// Parses the debounce string into a [`Duration`].
    pub fn debounce_duration(&self) -> Result<Duration, ConfigError> {
        humantime::parse_duration(&self.debounce).map_err(|e| ConfigError::InvalidDuration {
            field: "sync.debounce",
            value: self.debounce.clone(),
            message: e.to_string(),
        })
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Logging verbosity.
    pub level: LogLevel,
    /// Path to log file. Empty string means stderr.
    pub file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            file: String::new(),
        }
    }
}

/// Log verbosity levels (kebab-case in TOML).
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings.
    Warn,
    /// Informational messages (default).
    Info,
    /// Debug-level detail.
    Debug,
    /// Full trace output.
    Trace,
}

impl LogLevel {
    /// The directive string understood by `tracing_subscriber::EnvFilter`.
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_config_all_fields() {
        let toml_str = r#"
[sync]
backend = "memory"
debounce = "500ms"
data_dir = "/var/lib/smartglance"
user_id = "ana"

[logging]
level = "debug"
file = "/var/log/smartglance.log"
"#;
        let config: Config = toml::from_str(toml_str).expect("valid TOML should parse");
        assert_eq!(config.sync.backend, BackendKind::Memory);
        assert_eq!(config.sync.debounce, "500ms");
        assert_eq!(config.sync.data_dir, "/var/lib/smartglance");
        assert_eq!(config.sync.user_id, "ana");
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.file, "/var/log/smartglance.log");
    }

    #[test]
    fn parse_empty_string_uses_all_defaults() {
        let config: Config = toml::from_str("").expect("empty string should parse");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn parse_unknown_fields_are_ignored() {
        let toml_str = r#"
unknown_key = "hello"

[sync]
future_field = 42
"#;
        let config: Config = toml::from_str(toml_str).expect("unknown fields should be ignored");
        assert_eq!(config.sync.backend, BackendKind::File);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: Config =
            toml::from_str("[logging]\nlevel = \"trace\"\n").expect("partial config should parse");
        assert_eq!(config.logging.level, LogLevel::Trace);
        assert_eq!(config.sync.debounce, "1s");
        assert_eq!(config.sync.user_id, "local");
    }

    #[test]
    fn default_debounce_is_one_second() {
        let config = Config::default();
        assert_eq!(
            config.sync.debounce_duration().expect("default should parse"),
            Duration::from_secs(1)
        );
    }

    #[test]
    fn debounce_parses_humantime_strings() {
        let mut sync = SyncConfig::default();
        sync.debounce = "250ms".to_string();
        assert_eq!(
            sync.debounce_duration().expect("should parse"),
            Duration::from_millis(250)
        );
    }

    #[test]
    fn invalid_debounce_returns_error() {
        let mut sync = SyncConfig::default();
        sync.debounce = "soon".to_string();
        let err = sync.debounce_duration().expect_err("should fail");
        assert!(matches!(err, ConfigError::InvalidDuration { .. }));
    }

    #[test]
    fn invalid_backend_returns_error() {
        let result: Result<SyncConfig, _> = toml::from_str(r#"backend = "cloud""#);
        assert!(result.is_err());
    }

    #[test]
    fn log_level_all_variants() {
        for (input, expected) in [
            ("error", LogLevel::Error),
            ("warn", LogLevel::Warn),
            ("info", LogLevel::Info),
            ("debug", LogLevel::Debug),
            ("trace", LogLevel::Trace),
        ] {
            let toml_str = format!("level = \"{}\"", input);
            let logging: LoggingConfig =
                toml::from_str(&toml_str).expect("log level should parse");
            assert_eq!(logging.level, expected);
        }
    }

    #[test]
    fn roundtrip_serialize_deserialize() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).expect("serialization should succeed");
        let parsed: Config = toml::from_str(&toml_str).expect("roundtrip should parse");
        assert_eq!(config, parsed);
    }
}
