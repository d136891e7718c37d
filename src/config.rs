//! Configuration discovery and loading.
//!
//! Reads `contract-lint.toml|yaml|yml` from the project root (or closest
//! ancestor). Keys:
//! - `whitelist`: replaces the built-in suppression patterns
//! - `[general]`, `[domain]`: `program` and `args` of the external analyzers
//!
//! The analyzers read the contract source on stdin.

use crate::error::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const TOML_NAME: &str = "contract-lint.toml";
const YAML_NAMES: [&str; 2] = ["contract-lint.yaml", "contract-lint.yml"];

#[derive(Debug, Default, Deserialize, Clone, PartialEq, Eq)]
/// Command line of one external analyzer.
pub struct AnalyzerCfg {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Default, Deserialize, Clone, PartialEq, Eq)]
/// Root configuration loaded from `contract-lint.toml|yaml`.
pub struct LinterConfig {
    #[serde(default)]
    pub whitelist: Option<Vec<String>>,
    #[serde(default)]
    pub general: Option<AnalyzerCfg>,
    #[serde(default)]
    pub domain: Option<AnalyzerCfg>,
}

/// Walk upward from `start` to the directory holding the config or `.git`.
pub fn detect_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if cur.join(TOML_NAME).exists() || YAML_NAMES.iter().any(|n| cur.join(n).exists()) {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load the config in `root`, TOML first. `Ok(None)` when no file exists.
pub fn load_config(root: &Path) -> Result<Option<LinterConfig>, ConfigError> {
    let toml_path = root.join(TOML_NAME);
    if toml_path.exists() {
        let s = read(&toml_path)?;
        let cfg = toml::from_str(&s).map_err(|source| ConfigError::Toml {
            path: toml_path,
            source,
        })?;
        return Ok(Some(cfg));
    }
    for name in YAML_NAMES {
        let p = root.join(name);
        if p.exists() {
            let s = read(&p)?;
            let cfg = serde_yaml::from_str(&s)
                .map_err(|source| ConfigError::Yaml { path: p, source })?;
            return Ok(Some(cfg));
        }
    }
    tracing::debug!(root = %root.display(), "no config file found");
    Ok(None)
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}
