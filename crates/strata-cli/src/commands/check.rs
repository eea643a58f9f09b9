//! Check command implementation.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;

use crate::pipeline;
use crate::workspace::Solution;
use crate::OutputFormat;

/// Runs the check command.
pub fn run(
    path: &Path,
    format: OutputFormat,
    rules_filter: Option<String>,
    exclude: Vec<String>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = super::resolve_config(path, config_path)?;

    if let Some(filter) = rules_filter {
        restrict_to(&mut config, &filter);
    }

    let mut exclude_segments = config.analyzer.exclude.clone();
    exclude_segments.extend(exclude);

    let solution =
        Solution::load(path, &exclude_segments).context("Failed to load solution")?;

    tracing::info!(
        "Checking {} project(s) at {}",
        solution.projects.len(),
        solution.root.display()
    );

    let result = pipeline::run_check(&solution, &config);

    super::output::print(&result, format)?;

    if result.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

/// Disables every rule not named (by name or code) in the filter.
fn restrict_to(config: &mut strata_core::Config, filter: &str) {
    let mut keep = HashSet::new();
    for name in filter.split(',').map(str::trim) {
        match strata_rules::rule_by_name(name) {
            Some(rule) => {
                keep.insert(rule.descriptor().name.to_string());
            }
            None => tracing::warn!("Unknown rule: {}", name),
        }
    }

    for rule in strata_rules::built_in_rules() {
        let rule_name = rule.descriptor().name;
        if !keep.contains(rule_name) {
            config
                .rules
                .entry(rule_name.to_string())
                .or_default()
                .enabled = Some(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::Config;

    #[test]
    fn filter_disables_unlisted_rules() {
        let mut config = Config::default();
        restrict_to(&mut config, "dal-low-level-call");
        assert!(config.is_rule_enabled("dal-low-level-call"));
        assert!(!config.is_rule_enabled("uninitialized-readonly-field"));
    }

    #[test]
    fn filter_accepts_codes() {
        let mut config = Config::default();
        restrict_to(&mut config, "SL103");
        assert!(config.is_rule_enabled("uninitialized-readonly-field"));
        assert!(!config.is_rule_enabled("dal-low-level-call"));
    }
}
