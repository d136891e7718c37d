//! Lint runner: runs both analyzers in parallel and assembles one report.
//!
//! Each analyzer stream is whitelisted and normalized on its own, then the
//! streams are merged general-first, deduplicated on `(message, position)`,
//! and ordered by line with position-less findings last.

use crate::analyzer::{
    Analyzer, CancelToken, CommandBackend, DomainAdapter, GeneralAdapter, STDIN_REPORT_NAME,
};
use crate::config::{AnalyzerCfg, LinterConfig};
use crate::error::{AnalyzerFault, ConfigError, LintError};
use crate::models::raw::{AnalyzerKind, RawDiagnostic};
use crate::models::{Diagnostic, Position, Report};
use crate::normalize::normalize;
use crate::whitelist::Whitelist;
use std::collections::HashSet;

pub const EMPTY_SOURCE: &str = "empty source";

type Stream = Result<Vec<RawDiagnostic>, AnalyzerFault>;

/// Owns the two analyzers and the default whitelist.
pub struct Aggregator {
    general: Box<dyn Analyzer>,
    domain: Box<dyn Analyzer>,
    default_whitelist: Whitelist,
}

impl Aggregator {
    pub fn new(general: impl Analyzer + 'static, domain: impl Analyzer + 'static) -> Self {
        Self {
            general: Box::new(general),
            domain: Box::new(domain),
            default_whitelist: Whitelist::defaults(),
        }
    }

    /// Replace the whitelist used when a call supplies none.
    pub fn with_default_whitelist(mut self, whitelist: Whitelist) -> Self {
        self.default_whitelist = whitelist;
        self
    }

    /// Build command-backed analyzers from a loaded config.
    pub fn from_config(cfg: &LinterConfig) -> Result<Self, ConfigError> {
        let command = |c: Option<&AnalyzerCfg>, kind| {
            c.map(|c| CommandBackend::new(c.program.clone(), c.args.clone()))
                .ok_or(ConfigError::MissingAnalyzer(kind))
        };
        let general = command(cfg.general.as_ref(), AnalyzerKind::General)?;
        let domain = command(cfg.domain.as_ref(), AnalyzerKind::Domain)?;
        let whitelist = cfg
            .whitelist
            .as_ref()
            .map(|w| w.iter().cloned().collect::<Whitelist>())
            .unwrap_or_else(Whitelist::defaults);
        // Command backends receive the source on stdin.
        let general = GeneralAdapter::new(general).with_report_name(STDIN_REPORT_NAME);
        Ok(Self::new(general, DomainAdapter::new(domain)).with_default_whitelist(whitelist))
    }

    pub fn default_whitelist(&self) -> &Whitelist {
        &self.default_whitelist
    }

    /// Lint `source`. Always returns a report; analyzer faults become findings.
    ///
    /// `None` for `patterns` selects the default whitelist; an empty set
    /// suppresses nothing.
    pub fn lint(&self, source: &str, patterns: Option<&Whitelist>) -> Report {
        if is_blank(source) {
            return empty_source();
        }
        let span = tracing::debug_span!("lint", bytes = source.len());
        let _enter = span.enter();
        let (general, domain) = self.run_both(source, &CancelToken::new());
        self.assemble(general, domain, patterns)
    }

    /// Like [`Aggregator::lint`], but gives up once `cancel` fires.
    ///
    /// Backends that cannot be interrupted run to completion and their
    /// results are discarded.
    pub fn lint_cancellable(
        &self,
        source: &str,
        patterns: Option<&Whitelist>,
        cancel: &CancelToken,
    ) -> Result<Report, LintError> {
        if is_blank(source) {
            return Ok(empty_source());
        }
        let span = tracing::debug_span!("lint", bytes = source.len());
        let _enter = span.enter();
        let (general, domain) = self.run_both(source, cancel);
        if cancel.is_cancelled() {
            tracing::info!("lint cancelled by caller");
            return Err(LintError::Cancelled);
        }
        Ok(self.assemble(general, domain, patterns))
    }

    fn run_both(&self, source: &str, cancel: &CancelToken) -> (Stream, Stream) {
        rayon::join(
            || self.general.analyze_until(source, cancel),
            || self.domain.analyze_until(source, cancel),
        )
    }

    fn assemble(&self, general: Stream, domain: Stream, patterns: Option<&Whitelist>) -> Report {
        let whitelist = patterns.unwrap_or(&self.default_whitelist);
        let general = filter_normalize(AnalyzerKind::General, general, whitelist);
        let domain = filter_normalize(AnalyzerKind::Domain, domain, whitelist);
        let mut merged = merge_dedup(general, domain);
        sort_by_line(&mut merged);
        tracing::debug!(count = merged.len(), "lint finished");
        Report::new(merged)
    }
}

fn is_blank(source: &str) -> bool {
    source.trim().is_empty()
}

fn empty_source() -> Report {
    tracing::debug!("rejecting empty source");
    Report::new(vec![Diagnostic::error(EMPTY_SOURCE)])
}

/// Apply the whitelist then normalize. A fault becomes one synthetic finding
/// and is never whitelisted.
fn filter_normalize(kind: AnalyzerKind, stream: Stream, whitelist: &Whitelist) -> Vec<Diagnostic> {
    match stream {
        Ok(raw) => {
            let total = raw.len();
            let kept: Vec<Diagnostic> = raw
                .into_iter()
                .filter(|d| !whitelist.should_suppress(d))
                .map(normalize)
                .collect();
            tracing::debug!(
                analyzer = %kind,
                total,
                suppressed = total - kept.len(),
                "analyzer stream processed"
            );
            kept
        }
        Err(fault) => {
            tracing::warn!(analyzer = %fault.kind(), error = %fault, "analyzer fault");
            vec![Diagnostic::error(fault.to_string())]
        }
    }
}

/// Concatenate general-first and keep the first of each `(message, position)`.
///
/// Equal keys imply equal position presence, so the first occurrence is
/// always the general analyzer's copy when both report it.
pub fn merge_dedup(general: Vec<Diagnostic>, domain: Vec<Diagnostic>) -> Vec<Diagnostic> {
    let mut seen: HashSet<(String, Option<Position>)> = HashSet::new();
    general
        .into_iter()
        .chain(domain)
        .filter(|d| seen.insert((d.message().to_string(), d.position())))
        .collect()
}

/// Stable sort by line; findings without a position go last.
pub fn sort_by_line(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by_key(|d| (d.position().is_none(), d.position().map(|p| p.line())));
}
