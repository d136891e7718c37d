//! Error types for analyzers, configuration, and lint runs.

use crate::models::raw::AnalyzerKind;
use std::path::PathBuf;
use thiserror::Error;

/// Failure of an analyzer backend to produce any output.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("i/o with '{program}' failed: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' was terminated by a signal")]
    Terminated { program: String },

    #[error("'{program}' produced non-UTF-8 output")]
    Encoding { program: String },

    #[error("cancelled")]
    Cancelled,

    #[error("{0}")]
    Crashed(String),
}

/// An analyzer failed internally instead of reporting findings.
#[derive(Debug, Error)]
pub enum AnalyzerFault {
    #[error("{kind} analyzer failed internally: {source}")]
    Backend {
        kind: AnalyzerKind,
        #[source]
        source: BackendError,
    },

    #[error("{kind} analyzer failed internally: panicked: {message}")]
    Panicked { kind: AnalyzerKind, message: String },
}

impl AnalyzerFault {
    pub fn kind(&self) -> AnalyzerKind {
        match self {
            AnalyzerFault::Backend { kind, .. } | AnalyzerFault::Panicked { kind, .. } => *kind,
        }
    }
}

/// Errors while loading `contract-lint.toml|yaml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config {path} is not valid TOML: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("config {path} is not valid YAML: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("no command configured for the {0} analyzer")]
    MissingAnalyzer(AnalyzerKind),
}

/// The only failure `lint_cancellable` surfaces.
#[derive(Debug, Error)]
pub enum LintError {
    #[error("lint run cancelled")]
    Cancelled,
}
