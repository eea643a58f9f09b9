//! Generate command implementation.

use anyhow::{Context, Result};
use std::path::Path;
use strata_gen::TestStrategy;

use crate::pipeline;
use crate::workspace::Solution;

/// Runs the generate command.
pub fn run(path: &Path, strategy: TestStrategy, config_path: Option<&Path>) -> Result<()> {
    let config = super::resolve_config(path, config_path)?;

    let solution = Solution::load(path, &config.analyzer.exclude)
        .context("Failed to load solution")?;

    tracing::info!(
        "Generating tests ({} strategy) for {} project(s)",
        strategy,
        solution.projects.len()
    );

    let summary = pipeline::run_generate(&solution, &config, strategy);

    for path in &summary.written {
        println!("generated: {}", path.display());
    }

    println!(
        "Generated {} artifact(s), {} already present, {} project(s) without a test pair",
        summary.written.len(),
        summary.skipped_existing.len(),
        summary.skipped_projects.len()
    );

    Ok(())
}
