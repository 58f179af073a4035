//! Configuration types for the report parser.
//!
//! [`ParserConfig`] picks the output dialect (or asks for auto-detection) and
//! tunes the few layout knobs that vary between captures. Like the other
//! config types in this workspace it is cheap to clone, serde-friendly and
//! validated before use.
//!
//! # Versioning
//!
//! `version` selects the parser behavior the caller was written against.
//! Only versions up to [`PARSER_VERSION`] are accepted; a config asking for a
//! newer one fails validation instead of being parsed under older rules. The
//! version is recorded on every `report_parse_success` event.
//!
//! # Examples
//!
//! ```rust
//! use report::{Dialect, ParserConfig};
//!
//! let config = ParserConfig::default();
//! assert_eq!(config.version, 1);
//! assert_eq!(config.indent_step, 2);
//! assert!(config.dialect.is_none());
//!
//! let pinned = ParserConfig {
//!     dialect: Some(Dialect::V8_5),
//!     ..Default::default()
//! };
//! assert!(pinned.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::dialect::Dialect;
use crate::error::ParseError;

/// Highest parser behavior version this crate implements.
pub const PARSER_VERSION: u32 = 1;

/// Runtime configuration for [`parse_report_with_config`](crate::parse_report_with_config).
///
/// JSON form:
///
/// ```json
/// {
///   "version": 1,
///   "dialect": "v8_5",
///   "indent_step": 2,
///   "enforce_arity": true,
///   "max_input_bytes": 1048576
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ParserConfig {
    /// Parser behavior version, `1..=PARSER_VERSION`.
    pub version: u32,

    /// Output dialect to parse. `None` detects it from the text.
    pub dialect: Option<Dialect>,

    /// Number of leading spaces per summary nesting level.
    ///
    /// The appliance indents child categories by two spaces. A tab counts as
    /// one full level. Must be >= 1.
    pub indent_step: usize,

    /// Reject summary lines whose value count disagrees with the dialect's
    /// arity table (e.g. a triple on `Discarded`, a single value on
    /// `Total:`). Lines with anything other than one or three values are
    /// always rejected.
    pub enforce_arity: bool,

    /// Upper bound on input size in bytes. `None` disables the check.
    pub max_input_bytes: Option<usize>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            version: PARSER_VERSION,
            dialect: None,
            indent_step: 2,
            enforce_arity: true,
            max_input_bytes: None,
        }
    }
}

impl ParserConfig {
    /// Check the configuration for values the parser cannot work with.
    pub fn validate(&self) -> Result<(), ParseError> {
        if self.version == 0 || self.version > PARSER_VERSION {
            return Err(ParseError::InvalidConfig(format!(
                "parser version {} is not supported (1..={PARSER_VERSION})",
                self.version
            )));
        }
        if self.indent_step == 0 {
            return Err(ParseError::InvalidConfig(
                "indent_step must be >= 1".into(),
            ));
        }
        if self.max_input_bytes == Some(0) {
            return Err(ParseError::InvalidConfig(
                "max_input_bytes must be > 0 when set".into(),
            ));
        }
        Ok(())
    }
}
