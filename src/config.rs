//! YAML configuration file support for showflows.
//!
//! One file holds the parser settings and the logging setup of the binary.
//! Every section is optional and falls back to its defaults.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//!
//! parser:
//!   version: 1
//!   dialect: "v8_5"        # omit to detect from the report
//!   indent_step: 2
//!   enforce_arity: true
//!   max_input_bytes: 1048576
//!
//! logging:
//!   level: "info"
//!   json: false
//! ```
//!
//! The `SHOWFLOWS_LOG` environment variable, when set, replaces
//! `logging.level`.

use std::env;
use std::fs;
use std::path::Path;

use report::{Dialect, PARSER_VERSION, ParserConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable that overrides the configured log filter.
pub const LOG_ENV: &str = "SHOWFLOWS_LOG";

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct ShowflowsConfig {
    /// Configuration format version
    pub version: String,

    #[serde(default)]
    pub parser: ParserYamlConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ShowflowsConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: ShowflowsConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.parser.validate()?;
        self.logging.validate()?;

        Ok(())
    }

    /// The parser settings as the core crate's [`ParserConfig`].
    pub fn parser_config(&self) -> ParserConfig {
        self.parser.to_parser_config()
    }

    /// Log filter to install: `SHOWFLOWS_LOG` if set, else `logging.level`.
    pub fn log_filter(&self) -> String {
        match env::var(LOG_ENV) {
            Ok(filter) if !filter.trim().is_empty() => filter,
            _ => self.logging.level.clone(),
        }
    }
}

impl Default for ShowflowsConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            parser: ParserYamlConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Parser YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParserYamlConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    /// `None` means detect the dialect from each report.
    #[serde(default)]
    pub dialect: Option<Dialect>,

    #[serde(default = "default_indent_step")]
    pub indent_step: usize,

    #[serde(default = "true_value")]
    pub enforce_arity: bool,

    #[serde(default)]
    pub max_input_bytes: Option<usize>,
}

impl ParserYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        self.to_parser_config()
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("parser: {err}")))
    }

    pub fn to_parser_config(&self) -> ParserConfig {
        ParserConfig {
            version: self.version,
            dialect: self.dialect,
            indent_step: self.indent_step,
            enforce_arity: self.enforce_arity,
            max_input_bytes: self.max_input_bytes,
        }
    }
}

impl Default for ParserYamlConfig {
    fn default() -> Self {
        let defaults = ParserConfig::default();
        Self {
            version: defaults.version,
            dialect: defaults.dialect,
            indent_step: defaults.indent_step,
            enforce_arity: defaults.enforce_arity,
            max_input_bytes: defaults.max_input_bytes,
        }
    }
}

/// Logging YAML configuration for the binary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `"info"` or `"report=debug"`.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of the human-readable format.
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.level.trim().is_empty() {
            return Err(ConfigLoadError::Validation(
                "logging.level must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_version() -> u32 {
    PARSER_VERSION
}
fn default_indent_step() -> usize {
    2
}
fn true_value() -> bool {
    true
}
fn default_log_level() -> String {
    "warn".to_string()
}
