//! Summary label normalization.
//!
//! Turns a printed label such as `"  Packet-mode optimized (N):"` into the
//! category text used in summary keys (`"packet_mode optimized"`) and pulls
//! out the flow-type code, if the label carries one.
//!
//! # Rules
//!
//! 1. Trim, then drop the trailing colon.
//! 2. Remove parenthesized groups. A group whose content is a flow-type code
//!    (`(O)`, `(PI)`, ...) is remembered as the label's code; others such as
//!    `(terminated)` are dropped.
//! 3. Lower-case.
//! 4. A hyphen between two word characters joins a compound word and becomes
//!    `_` (`packet-mode` -> `packet_mode`). Any other punctuation, `+`
//!    included, separates words.
//! 5. Collapse whitespace to single spaces.
//!
//! ```rust
//! use report::{normalize_label, FlowType};
//!
//! let label = normalize_label("RiOS+SCPS (RS):");
//! assert_eq!(label.text, "rios scps");
//! assert_eq!(label.type_code, Some(FlowType::RiosScps));
//!
//! let label = normalize_label("Discarded (terminated):");
//! assert_eq!(label.text, "discarded");
//! assert_eq!(label.type_code, None);
//! ```

use std::sync::LazyLock;

use regex::Regex;

use crate::flow::FlowType;

static PAREN_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^()]*)\)").expect("static regex"));

/// A normalized summary label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// Normalized category text, e.g. `"half_opened optimized"`.
    pub text: String,
    /// Flow-type code from a `(XX)` suffix, when present.
    pub type_code: Option<FlowType>,
}

/// Normalize a raw summary label. See the module docs for the rules.
pub fn normalize_label(raw: &str) -> Label {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix(':').unwrap_or(trimmed);

    let mut type_code = None;
    for caps in PAREN_GROUP.captures_iter(trimmed) {
        if let Some(code) = FlowType::from_code(caps[1].trim()) {
            type_code = Some(code);
        }
    }
    let stripped = PAREN_GROUP.replace_all(trimmed, " ");

    let lowered = stripped.to_lowercase();
    let chars: Vec<char> = lowered.chars().collect();
    let mut mapped = String::with_capacity(lowered.len());
    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_alphanumeric() || ch == '_' {
            mapped.push(ch);
        } else if ch == '-'
            && is_word_at(&chars, i.checked_sub(1))
            && is_word_at(&chars, Some(i + 1))
        {
            mapped.push('_');
        } else {
            mapped.push(' ');
        }
    }

    Label {
        text: collapse_whitespace(&mapped),
        type_code,
    }
}

fn is_word_at(chars: &[char], idx: Option<usize>) -> bool {
    idx.and_then(|i| chars.get(i))
        .is_some_and(|c| c.is_alphanumeric())
}

/// Collapses repeated whitespace and trims both ends.
pub fn collapse_whitespace(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for segment in text.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(segment);
    }
    normalized
}
