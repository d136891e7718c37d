//! Adapter for the general-purpose syntax/semantics checker.
//!
//! The checker emits a text report, one finding per line:
//! `<file>:<line>:<col>: <message>` with 1-based line and column. The file
//! name is matched literally, so echoed source lines and caret markers in a
//! syntax-error block are skipped even when they contain colons.

use super::{guarded, strip_prefix, Analyzer, CancelToken};
use crate::error::{AnalyzerFault, BackendError};
use crate::models::raw::{AnalyzerKind, ColumnBase, RawDiagnostic};
use regex::Regex;

const PREFIX: &str = "Pyflakes error: ";

/// Report name used by in-process checkers.
pub const DEFAULT_REPORT_NAME: &str = "<string>";
/// Report name a checker uses when it reads the source from stdin.
pub const STDIN_REPORT_NAME: &str = "<stdin>";

/// Produces the raw text report of the general checker.
pub trait ReportBackend: Send + Sync {
    fn check(&self, source: &str, cancel: &CancelToken) -> Result<String, BackendError>;
}

impl<F> ReportBackend for F
where
    F: Fn(&str) -> Result<String, BackendError> + Send + Sync,
{
    fn check(&self, source: &str, _cancel: &CancelToken) -> Result<String, BackendError> {
        self(source)
    }
}

#[derive(Debug, Clone)]
/// Line grammar of a report whose findings are all attributed to one name.
pub struct ReportFormat {
    line: Regex,
}

impl ReportFormat {
    pub fn new(report_name: &str) -> Self {
        let pattern = format!(r"^{}:(\d+):(?:(\d+):)?\s*(.+)$", regex::escape(report_name));
        Self {
            line: Regex::new(&pattern).expect("escaped report name yields a valid pattern"),
        }
    }

    /// Parse a full text report into raw findings, in report order.
    pub fn parse_report(&self, text: &str) -> Vec<RawDiagnostic> {
        text.lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .filter_map(|l| self.parse_line(l))
            .collect()
    }

    fn parse_line(&self, line: &str) -> Option<RawDiagnostic> {
        let line = strip_prefix(line, PREFIX);
        let caps = self.line.captures(line)?;
        let line_no: u32 = caps.get(1)?.as_str().parse().ok()?;
        let message = caps.get(3)?.as_str().trim();
        let raw = RawDiagnostic::new(message);
        // A missing column means the whole line.
        Some(match caps.get(2).and_then(|c| c.as_str().parse::<u32>().ok()) {
            Some(col) => raw.at(line_no, col, ColumnBase::One),
            None => raw.at(line_no, 0, ColumnBase::Zero),
        })
    }
}

impl Default for ReportFormat {
    fn default() -> Self {
        Self::new(DEFAULT_REPORT_NAME)
    }
}

pub struct GeneralAdapter<B> {
    backend: B,
    format: ReportFormat,
}

impl<B: ReportBackend> GeneralAdapter<B> {
    /// Adapter for a checker that reports findings against `<string>`.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            format: ReportFormat::default(),
        }
    }

    /// Match findings attributed to `report_name` instead.
    pub fn with_report_name(mut self, report_name: &str) -> Self {
        self.format = ReportFormat::new(report_name);
        self
    }
}

impl<B: ReportBackend> Analyzer for GeneralAdapter<B> {
    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::General
    }

    fn analyze_until(
        &self,
        source: &str,
        cancel: &CancelToken,
    ) -> Result<Vec<RawDiagnostic>, AnalyzerFault> {
        let text = guarded(self.kind(), || self.backend.check(source, cancel))?;
        Ok(self.format.parse_report(&text))
    }
}
