//! Workspace umbrella crate for the "show flows" report parser.
//!
//! Re-exports the core parser from the `report` crate and adds what a caller
//! needs around it: loading a captured report from a file or reader, YAML
//! configuration, and JSON rendering of the result.

pub mod config;

pub use config::{ConfigLoadError, LoggingConfig, ParserYamlConfig, ShowflowsConfig};
pub use report::{
    Arity, CoerceError, CounterLine, CounterTriple, Dialect, FlowRecord, FlowReport,
    FlowReportParser, FlowType, Label, PARSER_VERSION, ParseError, ParserConfig, Ruleset,
    Section, Since, SummaryCounters, TOTAL_KEY, Timestamp, parse_counter_line, parse_report,
    parse_report_with_config, parse_row,
};

use std::error::Error;
use std::fmt;
use std::fs;
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tracing::debug;

/// Errors that can occur while loading and parsing a captured report.
#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Parse(ParseError),
    Config(ConfigLoadError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(err) => write!(f, "failed to read report: {err}"),
            LoadError::Parse(err) => write!(f, "failed to parse report: {err}"),
            LoadError::Config(err) => write!(f, "failed to load configuration: {err}"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LoadError::Io(err) => Some(err),
            LoadError::Parse(err) => Some(err),
            LoadError::Config(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(value: std::io::Error) -> Self {
        LoadError::Io(value)
    }
}

impl From<ParseError> for LoadError {
    fn from(value: ParseError) -> Self {
        LoadError::Parse(value)
    }
}

impl From<ConfigLoadError> for LoadError {
    fn from(value: ConfigLoadError) -> Self {
        LoadError::Config(value)
    }
}

/// Read a captured report from `path` and parse it.
pub fn load_report<P: AsRef<Path>>(path: P, cfg: &ParserConfig) -> Result<FlowReport, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = text.len(), "report_loaded");
    Ok(parse_report_with_config(&text, cfg)?)
}

/// Read a captured report from any reader (stdin, a socket, a buffer) and
/// parse it.
pub fn read_report<R: Read>(mut reader: R, cfg: &ParserConfig) -> Result<FlowReport, LoadError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(parse_report_with_config(&text, cfg)?)
}

/// Load a YAML config file and parse the report at `path` with it.
pub fn load_report_with_config_file<P, C>(path: P, config_path: C) -> Result<FlowReport, LoadError>
where
    P: AsRef<Path>,
    C: AsRef<Path>,
{
    let config = ShowflowsConfig::from_file(config_path)?;
    load_report(path, &config.parser_config())
}

/// Which part of a report to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputSection {
    /// Only `flows_list`.
    Flows,
    /// Only `flows_summary`.
    Summary,
    /// The whole `{flows_list, flows_summary}` object.
    #[default]
    All,
}

/// Render `report` (or one half of it) as JSON.
pub fn render_json(
    report: &FlowReport,
    section: OutputSection,
    pretty: bool,
) -> serde_json::Result<String> {
    match section {
        OutputSection::Flows => to_json(&report.flows_list, pretty),
        OutputSection::Summary => to_json(&report.flows_summary, pretty),
        OutputSection::All => to_json(report, pretty),
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}
