//! Summary counter parsing.
//!
//! Each counter line is `<indent><label>[:] <n1> [<n2> <n3>]`. The indentation
//! decides nesting: a line is a child of the closest preceding line with a
//! shallower level. Nesting is tracked with an explicit stack of
//! `(level, key)` frames.
//!
//! ```text
//! Passthrough :                    11  22  33   level 0  passthrough
//!
//!   Passthrough unintentional (PU): 11 22  33   level 1  passthrough unintentional
//!
//!     Packet-mode:                 11  22  33   level 2  passthrough unintentional packet_mode
//! ```
//!
//! Blank lines and rule lines are skipped and leave the stack untouched.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::coerce::parse_counter;
use crate::config::ParserConfig;
use crate::dialect::Ruleset;
use crate::error::{CoerceError, ParseError};
use crate::label::{normalize_label, Label};
use crate::report::{CounterTriple, SummaryCounters};
use crate::section::{is_rule_line, Line};

static COUNTER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<label>[^\s:][^:]*?)\s*:?\s+(?P<values>\d+(?:\s+\d+)*)\s*$")
        .expect("static regex")
});

/// One parsed counter line, before it is placed in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterLine {
    /// Nesting level: leading whitespace width divided by the indent step.
    pub level: usize,
    pub label: Label,
    pub counters: CounterTriple,
}

/// Parse a single summary line without any hierarchy context.
///
/// ```rust
/// use report::parse_counter_line;
///
/// let line = parse_counter_line("    Packet-mode:        11     22     33", 2).expect("line");
/// assert_eq!(line.level, 2);
/// assert_eq!(line.label.text, "packet_mode");
/// assert_eq!(line.counters.v6, Some(33));
/// ```
pub fn parse_counter_line(line: &str, indent_step: usize) -> Result<CounterLine, CoerceError> {
    let body = line.trim_start();
    let indent = &line[..line.len() - body.len()];
    let width: usize = indent
        .chars()
        .map(|c| if c == '\t' { indent_step } else { 1 })
        .sum();
    let level = width / indent_step.max(1);

    let caps = COUNTER_LINE
        .captures(body)
        .ok_or(CoerceError::MissingCounters)?;

    let label = normalize_label(&caps["label"]);
    if label.text.is_empty() {
        return Err(CoerceError::EmptyLabel);
    }

    let values = caps["values"]
        .split_whitespace()
        .map(parse_counter)
        .collect::<Result<Vec<u64>, _>>()?;

    let counters = match values.as_slice() {
        [all] => CounterTriple::single(*all),
        [all, v4, v6] => CounterTriple::triple(*all, *v4, *v6),
        other => {
            return Err(CoerceError::CounterArity {
                key: label.text,
                expected: 3,
                found: other.len(),
            })
        }
    };

    Ok(CounterLine {
        level,
        label,
        counters,
    })
}

struct Frame {
    level: usize,
    key: String,
}

/// Build the counter map from the summary block.
pub(crate) fn parse_summary(
    lines: &[Line<'_>],
    rules: &Ruleset,
    cfg: &ParserConfig,
) -> Result<SummaryCounters, ParseError> {
    let mut summary = SummaryCounters::default();
    let mut stack: Vec<Frame> = Vec::new();

    for line in lines {
        if line.is_blank() || is_rule_line(line.text) {
            continue;
        }

        let malformed = |reason| ParseError::MalformedSummaryLine {
            line_no: line.no,
            line: line.text.to_string(),
            reason,
        };

        let parsed = parse_counter_line(line.text, cfg.indent_step).map_err(malformed)?;

        while stack.last().is_some_and(|f| f.level >= parsed.level) {
            stack.pop();
        }
        let parent = stack.last().map(|f| f.key.as_str());
        let key = rules.category_key(parent, &parsed.label);

        let expected = rules.arity(&key).count();
        if cfg.enforce_arity && parsed.counters.arity() != expected {
            return Err(malformed(CoerceError::CounterArity {
                key,
                expected,
                found: parsed.counters.arity(),
            }));
        }

        if let Some(previous) = summary.insert(key.clone(), parsed.counters) {
            warn!(
                key = %key,
                line_no = line.no,
                previous_all = previous.all,
                "summary_key_repeated"
            );
        }

        stack.push(Frame {
            level: parsed.level,
            key,
        });
    }

    Ok(summary)
}
