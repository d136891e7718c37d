//! Output rendering for lint reports.
//!
//! Supports `human` and `json`. The JSON form is the fixed report contract:
//! `{"success": bool, "errors": [{"message", "severity", "position"?}]}`.

use crate::models::{Diagnostic, Report, Severity};
use owo_colors::OwoColorize;
use serde_json::Value as JsonVal;
use std::fmt::Write;

/// Colors are on unless `NO_COLOR` is set.
pub fn use_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

/// Compose the report JSON object (pure) for transport or snapshots.
pub fn compose_report_json(report: &Report) -> JsonVal {
    serde_json::to_value(report).unwrap_or(JsonVal::Null)
}

/// Render one line per diagnostic followed by a summary line.
pub fn render_human(report: &Report, color: bool) -> String {
    let mut out = String::new();
    for d in report.errors() {
        let _ = writeln!(out, "{}", human_line(d, color));
    }
    let summary = format!(
        "— Summary — errors={} warnings={}",
        report.count(Severity::Error),
        report.count(Severity::Warning)
    );
    if color {
        let _ = writeln!(out, "{}", summary.bold());
    } else {
        let _ = writeln!(out, "{}", summary);
    }
    out
}

fn human_line(d: &Diagnostic, color: bool) -> String {
    let (icon, tag) = match d.severity() {
        Severity::Error => ("✖", "⟦error⟧"),
        Severity::Warning => ("▲", "⟦warn⟧"),
    };
    let loc = d
        .position()
        .map(|p| format!("{}:{}", p.line(), p.column()))
        .unwrap_or_else(|| "-".to_string());
    if !color {
        return format!("{} {} {} — {}", icon, tag, loc, d.message());
    }
    let (icon, tag) = match d.severity() {
        Severity::Error => (icon.red().to_string(), tag.red().bold().to_string()),
        Severity::Warning => (icon.yellow().to_string(), tag.yellow().bold().to_string()),
    };
    format!("{} {} {} — {}", icon, tag, loc.bold(), d.message())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Position;

    fn sample() -> Report {
        Report::new(vec![
            Diagnostic::new(
                "undefined name 'balances'".into(),
                Severity::Error,
                Position::new(3, 4),
            ),
            Diagnostic::new("syntax error".into(), Severity::Warning, None),
        ])
    }

    #[test]
    fn test_compose_report_json_shape() {
        let out = compose_report_json(&sample());
        assert_eq!(out["success"], false);
        assert_eq!(out["errors"][0]["message"], "undefined name 'balances'");
        assert_eq!(out["errors"][0]["severity"], "error");
        assert_eq!(out["errors"][0]["position"]["line"], 3);
        assert_eq!(out["errors"][0]["position"]["column"], 4);
        assert_eq!(out["errors"][1]["severity"], "warning");
        // Absent positions are omitted, not null
        assert!(out["errors"][1].as_object().unwrap().get("position").is_none());
    }

    #[test]
    fn test_compose_report_json_success() {
        let out = compose_report_json(&Report::new(Vec::new()));
        assert_eq!(out, serde_json::json!({"success": true, "errors": []}));
    }

    #[test]
    fn test_render_human_plain() {
        let text = render_human(&sample(), false);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "✖ ⟦error⟧ 3:4 — undefined name 'balances'");
        assert_eq!(lines[1], "▲ ⟦warn⟧ - — syntax error");
        assert_eq!(lines[2], "— Summary — errors=1 warnings=1");
    }
}
