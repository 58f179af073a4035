//! Output dialects and their summary rulesets.
//!
//! The summary taxonomy is fixed per appliance output version, so the rules
//! that are not derivable from layout alone live here as plain tables:
//!
//! - which categories print a single value instead of `All V4 V6`
//! - how an indented label combines with its parent into a key
//!
//! # Key rules
//!
//! A label carrying a flow-type code (`RiOS Only (O)`,
//! `Passthrough intentional (PI)`) names its category on its own, even when
//! indented. A label without a code is qualified by its parent's key
//! (`Terminated` under `passthrough unintentional` becomes
//! `passthrough unintentional terminated`), unless it already starts with
//! that key.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, Section};
use crate::label::Label;
use crate::section::is_table_header;

/// Appliance output dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Dialect {
    /// Layout of the 8.5-era "show flows" command.
    #[serde(rename = "v8_5")]
    V8_5,
}

/// Number of values a summary category prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Single,
    Triple,
}

impl Arity {
    pub fn count(&self) -> usize {
        match self {
            Arity::Single => 1,
            Arity::Triple => 3,
        }
    }
}

/// Summary rules of one dialect.
#[derive(Debug)]
pub struct Ruleset {
    pub name: &'static str,
    /// Category keys printed with one value only.
    pub single_valued: &'static [&'static str],
}

static V8_5_RULES: Ruleset = Ruleset {
    name: "v8_5",
    single_valued: &["discarded", "denied"],
};

impl Dialect {
    /// Pick the dialect whose layout matches `text`.
    ///
    /// Only the flow table header is examined; a text without one is not a
    /// report of any known dialect.
    pub fn detect(text: &str) -> Result<Self, ParseError> {
        if text.lines().any(is_table_header) {
            Ok(Dialect::V8_5)
        } else {
            Err(ParseError::MissingSection {
                section: Section::TableHeader,
            })
        }
    }

    pub fn rules(&self) -> &'static Ruleset {
        match self {
            Dialect::V8_5 => &V8_5_RULES,
        }
    }

    pub fn name(&self) -> &'static str {
        self.rules().name
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Ruleset {
    pub fn arity(&self, key: &str) -> Arity {
        if self.single_valued.contains(&key) {
            Arity::Single
        } else {
            Arity::Triple
        }
    }

    /// Build the summary key for `label` nested under `parent`.
    pub fn category_key(&self, parent: Option<&str>, label: &Label) -> String {
        match parent {
            Some(parent)
                if label.type_code.is_none() && !starts_with_key(&label.text, parent) =>
            {
                format!("{parent} {}", label.text)
            }
            _ => label.text.clone(),
        }
    }
}

fn starts_with_key(text: &str, key: &str) -> bool {
    text.strip_prefix(key)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(' '))
}
