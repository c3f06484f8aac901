//! Tool configuration parsed from environment variables.
//!
//! Settings can be overridden via environment variables prefixed with
//! `BDD_AUDIT_`; command line flags take precedence over both.

use std::env;
use std::str::FromStr;

use thiserror::Error;

/// Error raised when a configuration value cannot be parsed.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A log level outside the accepted set was supplied.
    #[error("unknown log level '{0}', expected one of: trace, debug, info, warn, error")]
    UnknownLogLevel(String),
}

/// Verbosity levels mapped onto `tracing` filter directives.
///
/// Defaults to `Warn` so report output stays quiet unless asked otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Everything, including span lifecycle detail.
    Trace,
    /// Diagnostic output for development.
    Debug,
    /// High-level progress messages.
    Info,
    /// Recoverable problems; the scanners report skipped files here.
    #[default]
    Warn,
    /// Failures only.
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(ConfigError::UnknownLogLevel(s.to_owned())),
        }
    }
}

impl LogLevel {
    /// Convert to a tracing filter directive string.
    #[must_use]
    pub fn as_filter_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Configuration for the audit tool.
///
/// # Environment Variables
///
/// - `BDD_AUDIT_LOG_LEVEL`: Sets the log level (trace, debug, info, warn,
///   error)
#[derive(Debug, Clone, Default)]
pub struct AuditConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: LogLevel,
}

impl AuditConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads `BDD_AUDIT_LOG_LEVEL` and falls back to the default for a
    /// missing value.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if an environment variable contains an
    /// invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let log_level = match env::var("BDD_AUDIT_LOG_LEVEL") {
            Ok(val) => val.parse()?,
            Err(_) => LogLevel::default(),
        };

        Ok(Self { log_level })
    }

    /// Fold command line overrides into the configuration.
    ///
    /// Flags beat environment values, which beat defaults.
    #[must_use]
    pub fn apply_overrides(mut self, log_level: Option<LogLevel>) -> Self {
        if let Some(level) = log_level {
            self.log_level = level;
        }

        self
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests require explicit panic messages for debugging failures"
)]
mod tests {
    use super::*;

    #[test]
    fn log_level_parses_the_documented_values_in_any_case() {
        assert_eq!("trace".parse::<LogLevel>().ok(), Some(LogLevel::Trace));
        assert_eq!("DEBUG".parse::<LogLevel>().ok(), Some(LogLevel::Debug));
        assert_eq!("Info".parse::<LogLevel>().ok(), Some(LogLevel::Info));
        assert_eq!("warn".parse::<LogLevel>().ok(), Some(LogLevel::Warn));
        assert_eq!("Warning".parse::<LogLevel>().ok(), Some(LogLevel::Warn));
        assert_eq!("error".parse::<LogLevel>().ok(), Some(LogLevel::Error));
    }

    #[test]
    fn log_level_rejects_values_outside_the_set() {
        let result = "loud".parse::<LogLevel>();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("unknown log level 'loud'"));
    }

    #[test]
    fn filter_directives_match_tracing_names() {
        assert_eq!(LogLevel::Trace.as_filter_str(), "trace");
        assert_eq!(LogLevel::Warn.as_filter_str(), "warn");
        assert_eq!(LogLevel::Error.as_filter_str(), "error");
    }

    #[test]
    fn audit_config_defaults_to_warn() {
        let config = AuditConfig::default();
        assert_eq!(config.log_level, LogLevel::Warn);
    }

    #[test]
    fn audit_config_apply_overrides_updates_the_level() {
        let config = AuditConfig::default().apply_overrides(Some(LogLevel::Debug));
        assert_eq!(config.log_level, LogLevel::Debug);

        let config = AuditConfig::default().apply_overrides(None);
        assert_eq!(config.log_level, LogLevel::Warn);
    }
}
