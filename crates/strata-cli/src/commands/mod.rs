//! CLI subcommand implementations.

pub mod check;
pub mod generate;
pub mod init;
pub mod list_rules;
pub mod output;

use anyhow::{Context, Result};
use std::path::Path;
use strata_core::Config;

/// Resolves configuration: an explicit `--config` path, a `strata.toml`
/// at the solution root, or built-in defaults.
pub fn resolve_config(root: &Path, explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return Config::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()));
    }

    let default_path = root.join("strata.toml");
    if default_path.is_file() {
        tracing::debug!("Using config: {}", default_path.display());
        return Config::from_file(&default_path)
            .with_context(|| format!("Failed to load config: {}", default_path.display()));
    }

    Ok(Config::default())
}
