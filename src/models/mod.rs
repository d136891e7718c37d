//! Canonical data models for lint output.
//!
//! `Diagnostic` and `Report` are the only shapes consumers ever see; the
//! analyzer-native forms live in [`raw`].

pub mod raw;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
/// A location in the source: 1-based line, 0-based column.
pub struct Position {
    line: u32,
    column: u32,
}

impl Position {
    /// Build a position, rejecting line 0.
    pub fn new(line: u32, column: u32) -> Option<Self> {
        (line >= 1).then_some(Self { line, column })
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A single normalized lint finding.
pub struct Diagnostic {
    message: String,
    severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<Position>,
}

impl Diagnostic {
    pub(crate) fn new(message: String, severity: Severity, position: Option<Position>) -> Self {
        Self {
            message,
            severity,
            position,
        }
    }

    /// A position-less error, used for synthetic findings.
    pub(crate) fn error(message: impl Into<String>) -> Self {
        Self::new(message.into(), Severity::Error, None)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// Identity used for deduplication. Severity is deliberately excluded.
    pub fn key(&self) -> (&str, Option<Position>) {
        (self.message.as_str(), self.position)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Final result of one lint run.
///
/// Only the aggregator builds reports, so `errors` is always deduplicated
/// and ordered.
pub struct Report {
    success: bool,
    errors: Vec<Diagnostic>,
}

impl Report {
    pub(crate) fn new(errors: Vec<Diagnostic>) -> Self {
        Self {
            success: errors.is_empty(),
            errors,
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.errors.iter().filter(|d| d.severity == severity).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_rejects_line_zero() {
        assert!(Position::new(0, 3).is_none());
        let p = Position::new(1, 0).unwrap();
        assert_eq!((p.line(), p.column()), (1, 0));
    }

    #[test]
    fn test_report_success_tracks_emptiness() {
        assert!(Report::new(Vec::new()).success());
        let r = Report::new(vec![Diagnostic::error("boom")]);
        assert!(!r.success());
        assert_eq!(r.count(Severity::Error), 1);
        assert_eq!(r.count(Severity::Warning), 0);
    }

    #[test]
    fn test_key_ignores_severity() {
        let a = Diagnostic::error("x");
        let b = Diagnostic::new("x".into(), Severity::Warning, None);
        assert_eq!(a.key(), b.key());
    }
}
