//! Mapping from raw analyzer findings to canonical diagnostics.
//!
//! Canonical positions are 1-based lines and 0-based columns. Only this
//! module converts column bases.

use crate::models::raw::{ColumnBase, RawDiagnostic, RawPosition};
use crate::models::{Diagnostic, Position, Severity};
use regex::Regex;
use std::sync::OnceLock;

fn location_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\s*\(<unknown>,\s*line\s*\d+\)$").expect("location suffix pattern is valid")
    })
}

/// Drop the trailing `(<unknown>, line N)` that parsers append to syntax errors.
pub fn standardize_message(message: &str) -> String {
    location_suffix().replace(message.trim(), "").into_owned()
}

pub fn normalize_position(raw: RawPosition) -> Option<Position> {
    let column = match raw.base {
        ColumnBase::Zero => raw.column,
        ColumnBase::One => raw.column.saturating_sub(1),
    };
    Position::new(raw.line, column)
}

pub fn normalize(raw: RawDiagnostic) -> Diagnostic {
    Diagnostic::new(
        standardize_message(&raw.message),
        raw.severity.unwrap_or(Severity::Error),
        raw.position.and_then(normalize_position),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standardize_strips_location_suffix() {
        assert_eq!(
            standardize_message("invalid syntax (<unknown>, line 3)"),
            "invalid syntax"
        );
        assert_eq!(
            standardize_message("line 3 is (<unknown>) fine"),
            "line 3 is (<unknown>) fine"
        );
    }

    #[test]
    fn test_column_bases_converge() {
        let one = normalize_position(RawPosition {
            line: 4,
            column: 5,
            base: ColumnBase::One,
        });
        let zero = normalize_position(RawPosition {
            line: 4,
            column: 4,
            base: ColumnBase::Zero,
        });
        assert_eq!(one, zero);
        assert_eq!(one, Position::new(4, 4));
    }

    #[test]
    fn test_one_based_zero_column_saturates() {
        let p = normalize_position(RawPosition {
            line: 1,
            column: 0,
            base: ColumnBase::One,
        });
        assert_eq!(p, Position::new(1, 0));
    }

    #[test]
    fn test_line_zero_loses_position() {
        let d = normalize(RawDiagnostic::new("odd").at(0, 2, ColumnBase::Zero));
        assert!(d.position().is_none());
        assert_eq!(d.message(), "odd");
    }

    #[test]
    fn test_severity_defaults_to_error_and_is_preserved() {
        assert_eq!(normalize(RawDiagnostic::new("a")).severity(), Severity::Error);
        let w = RawDiagnostic::new("a").with_severity(Severity::Warning);
        assert_eq!(normalize(w).severity(), Severity::Warning);
    }
}
