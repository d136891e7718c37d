//! Contract-lint core library.
//!
//! Runs a general-purpose checker and a contract-convention rule checker over
//! the same source in parallel, drops findings that mention framework-injected
//! names, and merges the rest into one ordered, deduplicated `Report`.
//!
//! High-level modules:
//! - `analyzer`: The `Analyzer` trait, both adapters, and the process backend.
//! - `config`: Discovery and loading of `contract-lint.toml|yaml`.
//! - `error`: Typed errors for analyzers, config, and cancellation.
//! - `lint`: The `Aggregator` (parallel run, merge, dedup, ordering).
//! - `models`: Canonical `Diagnostic`/`Report` and raw analyzer findings.
//! - `normalize`: Raw to canonical mapping and message cleanup.
//! - `output`: Human/JSON rendering of a report.
//! - `whitelist`: Suppression patterns and the default set.
pub mod analyzer;
pub mod config;
pub mod error;
pub mod lint;
pub mod models;
pub mod normalize;
pub mod output;
pub mod whitelist;

pub use analyzer::{Analyzer, CancelToken};
pub use lint::Aggregator;
pub use models::{Diagnostic, Position, Report, Severity};
pub use whitelist::Whitelist;
