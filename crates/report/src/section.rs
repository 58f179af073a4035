//! Locating the flow table and the summary block inside a report.
//!
//! ```text
//! T  Source   Destination   App   Rdn Since      <- TableHeader
//! ----------------------------------------       <- TableRule
//! N  10.190.0.1:406  ...                         <- data rows
//! ----------------------------------------       <- TableEnd
//!                          All    V4    V6       <- SummaryHeader
//! ----------------------------------------
//! Established Optimized:   1      2     3        <- summary lines
//! ...
//! Total:                   11     40    70       <- Total (last summary line)
//! ```

use tracing::debug;

use crate::error::{ParseError, Section};

const TABLE_COLUMNS: [&str; 6] = ["T", "Source", "Destination", "App", "Rdn", "Since"];
const SUMMARY_COLUMNS: [&str; 3] = ["All", "V4", "V6"];

/// One input line with its 1-based line number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Line<'a> {
    pub(crate) no: usize,
    pub(crate) text: &'a str,
}

impl<'a> Line<'a> {
    pub(crate) fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// The two slices of lines the parsers work on.
#[derive(Debug)]
pub(crate) struct Sections<'t, 'a> {
    /// Lines strictly between the table's two rule lines.
    pub(crate) table_rows: &'t [Line<'a>],
    /// Lines after the `All V4 V6` header, up to and including `Total:`.
    pub(crate) summary_lines: &'t [Line<'a>],
}

pub(crate) fn number_lines(text: &str) -> Vec<Line<'_>> {
    text.lines()
        .enumerate()
        .map(|(idx, text)| Line { no: idx + 1, text })
        .collect()
}

pub(crate) fn is_rule_line(text: &str) -> bool {
    let t = text.trim();
    t.len() >= 3 && t.bytes().all(|b| b == b'-')
}

pub(crate) fn is_table_header(text: &str) -> bool {
    text.split_whitespace().eq(TABLE_COLUMNS)
}

pub(crate) fn is_summary_header(text: &str) -> bool {
    text.split_whitespace().eq(SUMMARY_COLUMNS)
}

pub(crate) fn is_total_line(text: &str) -> bool {
    text.trim_start().starts_with("Total:")
}

fn missing(section: Section) -> ParseError {
    ParseError::MissingSection { section }
}

fn find_from(lines: &[Line<'_>], from: usize, pred: impl Fn(&str) -> bool) -> Option<usize> {
    lines
        .get(from..)?
        .iter()
        .position(|l| pred(l.text))
        .map(|pos| from + pos)
}

/// Find the table and summary blocks, or name the first missing marker.
pub(crate) fn locate<'t, 'a>(lines: &'t [Line<'a>]) -> Result<Sections<'t, 'a>, ParseError> {
    let header =
        find_from(lines, 0, is_table_header).ok_or_else(|| missing(Section::TableHeader))?;

    // The rule line follows the header directly; blank lines in between are tolerated.
    let rule = lines[header + 1..]
        .iter()
        .position(|l| !l.is_blank())
        .map(|pos| header + 1 + pos)
        .filter(|&idx| is_rule_line(lines[idx].text))
        .ok_or_else(|| missing(Section::TableRule))?;

    let table_end =
        find_from(lines, rule + 1, is_rule_line).ok_or_else(|| missing(Section::TableEnd))?;

    let summary_header = find_from(lines, table_end + 1, is_summary_header)
        .ok_or_else(|| missing(Section::SummaryHeader))?;

    let total = find_from(lines, summary_header + 1, is_total_line)
        .ok_or_else(|| missing(Section::Total))?;

    debug!(
        table_header_line = lines[header].no,
        table_end_line = lines[table_end].no,
        summary_header_line = lines[summary_header].no,
        total_line = lines[total].no,
        "report_sections_located"
    );

    Ok(Sections {
        table_rows: &lines[rule + 1..table_end],
        summary_lines: &lines[summary_header + 1..=total],
    })
}
