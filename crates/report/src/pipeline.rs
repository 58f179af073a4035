use std::time::Instant;

use tracing::{info, warn, Level};

use crate::config::ParserConfig;
use crate::dialect::Dialect;
use crate::error::{CoerceError, ParseError};
use crate::report::FlowReport;
use crate::section::{locate, number_lines};
use crate::summary::parse_summary;
use crate::table::parse_rows;

/// Parse a report with the default configuration (dialect auto-detected).
pub fn parse_report(text: &str) -> Result<FlowReport, ParseError> {
    parse_report_with_config(text, &ParserConfig::default())
}

/// Main entry point. Takes the raw command output and returns the flow list
/// and the counter summary.
pub fn parse_report_with_config(
    text: &str,
    cfg: &ParserConfig,
) -> Result<FlowReport, ParseError> {
    cfg.validate()?;

    if let Some(limit) = cfg.max_input_bytes {
        if text.len() > limit {
            let err = ParseError::InputTooLarge {
                len: text.len(),
                limit,
            };
            warn!(error = %err, "report_parse_failure");
            return Err(err);
        }
    }

    let start = Instant::now();
    let span = tracing::span!(Level::INFO, "report.parse", input_len = text.len());
    let _guard = span.enter();

    match parse_inner(text, cfg) {
        Ok((dialect, report)) => {
            let elapsed_micros = start.elapsed().as_micros();
            info!(
                dialect = %dialect,
                version = cfg.version,
                flows = report.flows_list.len(),
                categories = report.flows_summary.len(),
                elapsed_micros,
                "report_parse_success"
            );
            Ok(report)
        }
        Err(err) => {
            let elapsed_micros = start.elapsed().as_micros();
            if let Some(CoerceError::FractionalPercentage(value)) = err.reason() {
                // Integer-only reductions are all this dialect has been seen to print.
                warn!(value = %value, "report_fractional_reduction");
            }
            warn!(error = %err, elapsed_micros, "report_parse_failure");
            Err(err)
        }
    }
}

fn parse_inner(text: &str, cfg: &ParserConfig) -> Result<(Dialect, FlowReport), ParseError> {
    let dialect = match cfg.dialect {
        Some(dialect) => dialect,
        None => Dialect::detect(text)?,
    };

    let lines = number_lines(text);
    let sections = locate(&lines)?;

    let flows_list = parse_rows(sections.table_rows)?;
    let flows_summary = parse_summary(sections.summary_lines, dialect.rules(), cfg)?;

    Ok((
        dialect,
        FlowReport {
            flows_list,
            flows_summary,
        },
    ))
}

/// A parser bound to one validated configuration.
///
/// Holds no state between calls; a single value can be shared across
/// threads.
#[derive(Debug, Clone, Default)]
pub struct FlowReportParser {
    cfg: ParserConfig,
}

impl FlowReportParser {
    pub fn new(cfg: ParserConfig) -> Result<Self, ParseError> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    pub fn config(&self) -> &ParserConfig {
        &self.cfg
    }

    pub fn parse(&self, text: &str) -> Result<FlowReport, ParseError> {
        parse_report_with_config(text, &self.cfg)
    }
}
