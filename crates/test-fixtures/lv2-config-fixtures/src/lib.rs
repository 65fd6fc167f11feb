//! Named host-configuration documents shared by tests and benches.
//!
//! `fixtures/manifest.json` at the workspace root maps a short name such as
//! `"mastering-chain"` to a YAML file under `fixtures/`. Tests refer to documents
//! by name so the files can move without touching every caller.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    serde_json::from_str(include_str!("../../../../fixtures/manifest.json"))
        .expect("fixtures/manifest.json is valid")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    /// Name to path relative to `fixtures/`.
    configs: HashMap<String, String>,
}

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

/// YAML configuration documents, including deliberately broken ones
/// (`"malformed"`, `"unknown-variable"`, `"scale-out-of-range"`).
pub mod configs {
    use super::*;

    /// Every registered name, sorted so iteration order is stable across runs.
    pub fn keys() -> Vec<String> {
        let mut keys: Vec<String> = MANIFEST.configs.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Absolute path of the named document.
    pub fn path(name: &str) -> Result<PathBuf> {
        MANIFEST
            .configs
            .get(name)
            .map(|rel| fixtures_dir().join(rel))
            .ok_or_else(|| anyhow!("no config fixture named '{name}'"))
    }

    /// Contents of the named document, unparsed.
    pub fn yaml(name: &str) -> Result<String> {
        let path = path(name)?;
        fs::read_to_string(&path)
            .with_context(|| format!("reading config fixture {}", path.display()))
    }
}
