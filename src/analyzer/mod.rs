//! Analyzer adapters.
//!
//! Each underlying checker sits behind the [`Analyzer`] trait and reports
//! [`RawDiagnostic`]s. Syntax errors in the linted source are findings, not
//! failures; only an analyzer that cannot produce a result at all returns an
//! [`AnalyzerFault`].

pub mod command;
pub mod domain;
pub mod general;

pub use command::CommandBackend;
pub use domain::{DomainAdapter, RuleBackend, RuleOutcome};
pub use general::{GeneralAdapter, ReportBackend, ReportFormat, STDIN_REPORT_NAME};

use crate::error::{AnalyzerFault, BackendError};
use crate::models::raw::{AnalyzerKind, RawDiagnostic};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable cancellation flag shared between a caller and running analyzers.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Uniform contract over both analyzers.
pub trait Analyzer: Send + Sync {
    fn kind(&self) -> AnalyzerKind;

    /// Analyze `source`, stopping early if `cancel` fires and the backend
    /// supports interruption.
    fn analyze_until(
        &self,
        source: &str,
        cancel: &CancelToken,
    ) -> Result<Vec<RawDiagnostic>, AnalyzerFault>;

    fn analyze(&self, source: &str) -> Result<Vec<RawDiagnostic>, AnalyzerFault> {
        self.analyze_until(source, &CancelToken::new())
    }
}

/// Run a backend call, turning both errors and panics into an `AnalyzerFault`.
pub(crate) fn guarded<T>(
    kind: AnalyzerKind,
    call: impl FnOnce() -> Result<T, BackendError>,
) -> Result<T, AnalyzerFault> {
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(Ok(v)) => Ok(v),
        Ok(Err(source)) => Err(AnalyzerFault::Backend { kind, source }),
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(AnalyzerFault::Panicked { kind, message })
        }
    }
}

/// Remove a known analyzer prefix such as `Pyflakes error: `.
pub(crate) fn strip_prefix<'a>(line: &'a str, prefix: &str) -> &'a str {
    line.strip_prefix(prefix).unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guarded_converts_panic() {
        let res: Result<(), _> = guarded(AnalyzerKind::Domain, || panic!("kaboom"));
        match res {
            Err(AnalyzerFault::Panicked { kind, message }) => {
                assert_eq!(kind, AnalyzerKind::Domain);
                assert_eq!(message, "kaboom");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_guarded_converts_backend_error() {
        let res: Result<(), _> = guarded(AnalyzerKind::General, || {
            Err(BackendError::Crashed("bad".into()))
        });
        let fault = res.unwrap_err();
        assert_eq!(fault.kind(), AnalyzerKind::General);
        assert_eq!(
            fault.to_string(),
            "general analyzer failed internally: bad"
        );
    }

    #[test]
    fn test_cancel_token_is_shared_between_clones() {
        let a = CancelToken::new();
        let b = a.clone();
        assert!(!b.is_cancelled());
        a.cancel();
        assert!(b.is_cancelled());
    }
}
