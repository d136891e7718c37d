//! Adapter for the contract-convention rule checker.
//!
//! The checker reports either a list of violation strings, typically
//! `Line <n>: <message>`, or a syntax failure for source it cannot parse.

use super::{guarded, strip_prefix, Analyzer, CancelToken};
use crate::error::{AnalyzerFault, BackendError};
use crate::models::raw::{AnalyzerKind, ColumnBase, RawDiagnostic};
use regex::Regex;
use std::sync::OnceLock;

const PREFIX: &str = "Contracting linter error: ";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Native result of the rule checker.
pub enum RuleOutcome {
    Violations(Vec<String>),
    /// The source did not parse. `offset` is 1-based.
    SyntaxError {
        message: String,
        line: Option<u32>,
        offset: Option<u32>,
    },
}

pub trait RuleBackend: Send + Sync {
    fn check(&self, source: &str, cancel: &CancelToken) -> Result<RuleOutcome, BackendError>;
}

impl<F> RuleBackend for F
where
    F: Fn(&str) -> Result<RuleOutcome, BackendError> + Send + Sync,
{
    fn check(&self, source: &str, _cancel: &CancelToken) -> Result<RuleOutcome, BackendError> {
        self(source)
    }
}

pub struct DomainAdapter<B> {
    backend: B,
}

impl<B: RuleBackend> DomainAdapter<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }
}

impl<B: RuleBackend> Analyzer for DomainAdapter<B> {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::Domain
    }

    fn analyze_until(
        &self,
        source: &str,
        cancel: &CancelToken,
    ) -> Result<Vec<RawDiagnostic>, AnalyzerFault> {
        let outcome = guarded(self.kind(), || self.backend.check(source, cancel))?;
        Ok(translate(outcome))
    }
}

fn violation_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^Line (\d+):\s*(.+)$").expect("violation pattern is valid"))
}

/// Translate a native outcome into raw findings.
pub fn translate(outcome: RuleOutcome) -> Vec<RawDiagnostic> {
    match outcome {
        RuleOutcome::Violations(lines) => lines
            .iter()
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(parse_violation)
            .collect(),
        RuleOutcome::SyntaxError {
            message,
            line,
            offset,
        } => {
            let raw = RawDiagnostic::new(message);
            let raw = match (line, offset) {
                (Some(l), Some(o)) => raw.at(l, o, ColumnBase::One),
                (Some(l), None) => raw.at(l, 0, ColumnBase::Zero),
                (None, _) => raw,
            };
            vec![raw]
        }
    }
}

fn parse_violation(violation: &str) -> RawDiagnostic {
    let violation = strip_prefix(violation, PREFIX);
    let parsed = violation_line().captures(violation).and_then(|caps| {
        let line: u32 = caps.get(1)?.as_str().parse().ok()?;
        Some((line, caps.get(2)?.as_str().trim()))
    });
    match parsed {
        Some((line, message)) => RawDiagnostic::new(message).at(line, 0, ColumnBase::Zero),
        None => RawDiagnostic::new(violation),
    }
}
