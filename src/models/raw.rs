//! Analyzer-native findings, before filtering and normalization.

use super::Severity;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Which of the two analyzers produced a finding.
pub enum AnalyzerKind {
    General,
    Domain,
}

impl AnalyzerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AnalyzerKind::General => "general",
            AnalyzerKind::Domain => "domain-specific",
        }
    }
}

impl fmt::Display for AnalyzerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Indexing base of a native column number.
pub enum ColumnBase {
    Zero,
    One,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A native position. `line` is always 1-based as reported.
pub struct RawPosition {
    pub line: u32,
    pub column: u32,
    pub base: ColumnBase,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDiagnostic {
    pub message: String,
    pub severity: Option<Severity>,
    pub position: Option<RawPosition>,
}

impl RawDiagnostic {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: None,
            position: None,
        }
    }

    pub fn at(mut self, line: u32, column: u32, base: ColumnBase) -> Self {
        self.position = Some(RawPosition { line, column, base });
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }
}
