//! Output types for a parsed report.
//!
//! A [`FlowReport`] holds the two halves of a "show flows" capture:
//!
//! ```text
//! FlowReport
//! ├── flows_list: Vec<FlowRecord>      # table rows, source order
//! └── flows_summary: SummaryCounters   # category key -> {all, v4, v6}
//! ```
//!
//! Both are built fresh per parse and never mutated by the parser afterwards.
//!
//! # Examples
//!
//! ```rust
//! use report::{CounterTriple, SummaryCounters};
//!
//! let mut summary = SummaryCounters::default();
//! summary.insert("total", CounterTriple::triple(11, 40, 70));
//! summary.insert("denied", CounterTriple::single(1));
//!
//! assert_eq!(summary.total().map(|t| t.all), Some(11));
//! assert_eq!(summary.get("denied").and_then(|t| t.v4), None);
//! ```

use std::collections::btree_map::{self, BTreeMap};

use serde::{Deserialize, Serialize};

use crate::flow::FlowRecord;

/// Key of the closing `Total:` line.
pub const TOTAL_KEY: &str = "total";

/// Counter values of one summary category.
///
/// Single-valued categories (`Discarded`, `Denied`) only carry `all`; `v4`
/// and `v6` stay `None` and are omitted when serialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CounterTriple {
    pub all: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v4: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v6: Option<u64>,
}

impl CounterTriple {
    pub fn single(all: u64) -> Self {
        Self {
            all,
            v4: None,
            v6: None,
        }
    }

    pub fn triple(all: u64, v4: u64, v6: u64) -> Self {
        Self {
            all,
            v4: Some(v4),
            v6: Some(v6),
        }
    }

    pub fn is_single(&self) -> bool {
        self.v4.is_none() && self.v6.is_none()
    }

    /// Number of values the line carried (1 or 3).
    pub fn arity(&self) -> usize {
        if self.is_single() {
            1
        } else {
            3
        }
    }
}

/// Flow-state counters keyed by normalized category name.
///
/// Keys encode the report's nesting by concatenation, for example
/// `"passthrough unintentional packet_mode"`. Iteration order is by key and
/// carries no meaning; look categories up by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SummaryCounters {
    entries: BTreeMap<String, CounterTriple>,
}

impl SummaryCounters {
    pub fn get(&self, key: &str) -> Option<&CounterTriple> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// The `Total:` line.
    pub fn total(&self) -> Option<&CounterTriple> {
        self.entries.get(TOTAL_KEY)
    }

    /// Insert a category, returning the previous value for the key, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: CounterTriple) -> Option<CounterTriple> {
        self.entries.insert(key.into(), value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, CounterTriple> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a SummaryCounters {
    type Item = (&'a String, &'a CounterTriple);
    type IntoIter = btree_map::Iter<'a, String, CounterTriple>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, CounterTriple)> for SummaryCounters {
    fn from_iter<I: IntoIterator<Item = (K, CounterTriple)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Structured form of one "show flows" capture.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowReport {
    /// Table rows in source order, first row first.
    pub flows_list: Vec<FlowRecord>,
    pub flows_summary: SummaryCounters,
}

impl FlowReport {
    pub fn total(&self) -> Option<&CounterTriple> {
        self.flows_summary.total()
    }
}
