//! Environment configuration for the demo binary.

use std::str::FromStr;

use thiserror::Error;

/// Startup errors for the demo binary.
#[derive(Debug, Error)]
pub enum DemoError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Multi-line human-readable output.
    Pretty,
}

impl FromStr for LogFormat {
    type Err = DemoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            other => Err(DemoError::Config(format!(
                "STRATA_LOG_FORMAT must be `json` or `pretty`, got `{other}`"
            ))),
        }
    }
}

/// Settings read from the environment at startup.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Output format of the tracing subscriber.
    pub log_format: LogFormat,
}

impl Config {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `DemoError::Config` if `STRATA_LOG_FORMAT` is set to an
    /// unsupported value.
    pub fn from_env() -> Result<Self, DemoError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DemoError> {
        let log_format = match lookup("STRATA_LOG_FORMAT") {
            Some(value) => value.parse()?,
            None => LogFormat::default(),
        };
        Ok(Self { log_format })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lookup_defaults_to_json() {
        // Act
        let config = Config::from_lookup(|_| None).unwrap();

        // Assert
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_from_lookup_parses_pretty_case_insensitively() {
        // Act
        let config = Config::from_lookup(|_| Some(" Pretty ".into())).unwrap();

        // Assert
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_from_lookup_rejects_unknown_format() {
        // Act
        let result = Config::from_lookup(|_| Some("xml".into()));

        // Assert
        match result.unwrap_err() {
            DemoError::Config(msg) => assert!(msg.contains("xml")),
        }
    }
}
