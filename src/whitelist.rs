//! Suppression of diagnostics that mention framework-injected names.
//!
//! Matching is a case-sensitive substring test on the message. This is
//! intentionally coarse: `ctx` also suppresses a message about `ctx_id`.

use crate::models::raw::RawDiagnostic;
use std::collections::BTreeSet;

/// Names the contract runtime injects at execution time, plus approved modules.
pub const DEFAULT_PATTERNS: &[&str] = &[
    "export",
    "construct",
    "Hash",
    "Variable",
    "ForeignHash",
    "ForeignVariable",
    "ctx",
    "now",
    "block_num",
    "block_hash",
    "chain_id",
    "random",
    "importlib",
    "hashlib",
    "datetime",
    "crypto",
    "decimal",
    "Any",
    "LogEvent",
];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// An immutable set of suppression patterns.
pub struct Whitelist {
    patterns: BTreeSet<String>,
}

impl Whitelist {
    /// The built-in pattern set.
    pub fn defaults() -> Self {
        DEFAULT_PATTERNS.iter().copied().collect()
    }

    /// Parse a comma-separated list. Blank input yields the defaults.
    pub fn parse_list(list: &str) -> Self {
        if list.trim().is_empty() {
            return Self::defaults();
        }
        list.split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(String::as_str)
    }

    /// True when any pattern occurs in `message`.
    pub fn matches(&self, message: &str) -> bool {
        self.patterns.iter().any(|p| message.contains(p.as_str()))
    }

    pub fn should_suppress(&self, diagnostic: &RawDiagnostic) -> bool {
        self.matches(&diagnostic.message)
    }
}

impl<S: Into<String>> FromIterator<S> for Whitelist {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            patterns: iter.into_iter().map(Into::into).collect(),
        }
    }
}
