//! Error types produced by the report parser.
//!
//! Two layers:
//!
//! - [`CoerceError`] is the typed reason a single token or line could not be
//!   turned into a value. The public helpers ([`parse_row`](crate::parse_row),
//!   [`parse_counter_line`](crate::parse_counter_line), the `parse_*`
//!   coercions) return it directly so callers can pick a strict or lenient
//!   policy without matching on message text.
//! - [`ParseError`] is what a whole-report parse returns. It wraps a
//!   `CoerceError` together with the offending line and its position, or names
//!   the section marker that could not be found.
//!
//! # Examples
//!
//! ```rust
//! use report::{parse_report, ParseError, Section};
//!
//! match parse_report("no report here") {
//!     Err(ParseError::MissingSection { section }) => {
//!         assert_eq!(section, Section::TableHeader);
//!     }
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```
use std::fmt;

use thiserror::Error;

/// Report section markers the parser must locate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// `T  Source  Destination  App  Rdn Since` column header.
    TableHeader,
    /// Rule line directly under the column header.
    TableRule,
    /// Rule line closing the flow table.
    TableEnd,
    /// `All  V4  V6` counter header.
    SummaryHeader,
    /// Closing `Total:` line.
    Total,
}

impl Section {
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::TableHeader => "flow table header",
            Section::TableRule => "flow table rule line",
            Section::TableEnd => "flow table terminating rule line",
            Section::SummaryHeader => "summary header (All V4 V6)",
            Section::Total => "summary Total: line",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a single token or line failed type coercion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CoerceError {
    #[error("expected 6 or 7 whitespace-separated fields, found {found}")]
    FieldCount { found: usize },

    #[error("flow type code `{0}` is empty or not a single token")]
    UnknownFlowType(String),

    #[error("endpoint `{0}` is not of the form address:port or [address]:port")]
    BadEndpoint(String),

    #[error("invalid address literal `{0}`")]
    BadAddress(String),

    #[error("invalid port `{0}`")]
    BadPort(String),

    #[error("reduction `{0}` is not an integer percentage")]
    BadPercentage(String),

    #[error("reduction `{0}` has a fractional part; only integer percentages are supported")]
    FractionalPercentage(String),

    #[error("reduction {0}% is outside 0..=100")]
    PercentageOutOfRange(u32),

    #[error("since `{0}` is neither pre_existing nor YYYY/MM/DD HH:MM:SS")]
    BadTimestamp(String),

    #[error("summary line has no counter values")]
    MissingCounters,

    #[error("counter `{0}` is not a non-negative integer")]
    BadCounter(String),

    #[error("category `{key}` expects {expected} value(s), found {found}")]
    CounterArity {
        key: String,
        expected: usize,
        found: usize,
    },

    #[error("summary line has an empty label")]
    EmptyLabel,
}

/// Errors returned by a whole-report parse.
///
/// The enum is `#[non_exhaustive]`; match with a catch-all arm.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    /// An expected header or footer marker was not found. Usually means the
    /// text comes from an unsupported appliance version or was truncated.
    #[error("missing section: {section}")]
    MissingSection { section: Section },

    /// A flow-table data row failed tokenization or coercion.
    #[error("malformed flow row {row} (line {line_no}): {reason}: `{line}`")]
    MalformedRow {
        /// 0-based index among the table's data rows.
        row: usize,
        /// 1-based line number in the input text.
        line_no: usize,
        line: String,
        reason: CoerceError,
    },

    /// A counter line in the summary section could not be parsed.
    #[error("malformed summary line {line_no}: {reason}: `{line}`")]
    MalformedSummaryLine {
        line_no: usize,
        line: String,
        reason: CoerceError,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("input of {len} bytes exceeds limit of {limit}")]
    InputTooLarge { len: usize, limit: usize },
}

impl ParseError {
    /// True when the input did not look like a supported report at all.
    pub fn is_missing_section(&self) -> bool {
        matches!(self, ParseError::MissingSection { .. })
    }

    /// The offending input line, for row and summary-line errors.
    pub fn line(&self) -> Option<&str> {
        match self {
            ParseError::MalformedRow { line, .. }
            | ParseError::MalformedSummaryLine { line, .. } => Some(line),
            _ => None,
        }
    }

    /// The typed coercion failure behind a row or summary-line error.
    pub fn reason(&self) -> Option<&CoerceError> {
        match self {
            ParseError::MalformedRow { reason, .. }
            | ParseError::MalformedSummaryLine { reason, .. } => Some(reason),
            _ => None,
        }
    }
}
