//! Configuration module - environment variable parsing

use std::env;
use std::path::PathBuf;

/// Analyzer configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory scanned for demo records
    pub input_dir: PathBuf,
    /// Directory the JSON reports are written to
    pub output_dir: PathBuf,
    /// File extension of demo records (without the dot)
    pub record_extension: String,
    /// Records analyzed at the same time
    pub max_concurrent_records: usize,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,
}

/// Output format of the log layer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    /// One JSON object per line, for log shippers
    Json,
}

impl LogFormat {
    fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_concurrent_records = match lookup("MAX_CONCURRENT_RECORDS") {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|n| *n >= 1)
                .ok_or(ConfigError::Invalid("MAX_CONCURRENT_RECORDS"))?,
            None => 4,
        };

        let log_format = match lookup("LOG_FORMAT") {
            Some(raw) => LogFormat::parse(&raw).ok_or(ConfigError::Invalid("LOG_FORMAT"))?,
            None => LogFormat::default(),
        };

        Ok(Self {
            input_dir: lookup("INPUT_DIR")
                .map(PathBuf::from)
                .ok_or(ConfigError::Missing("INPUT_DIR"))?,
            output_dir: lookup("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./analysis")),
            record_extension: lookup("RECORD_EXTENSION")
                .map(|ext| ext.trim_start_matches('.').to_string())
                .unwrap_or_else(|| "kf2rec".to_string()),
            max_concurrent_records,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_format,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}
