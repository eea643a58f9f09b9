//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# strata configuration

[analyzer]
# Solution root to analyze (default: current directory)
# root = "."

# Path segments excluded from document discovery
exclude = ["bin", "obj"]

# Conventions the classifier and rules key on.
# Defaults shown; uncomment to override.

[conventions]
# dal_base_name = "AbstractDal"
# dal_prefix = "Dal"
# implementation_marker = "RegisterImpl"
# contract_marker = "RegisterContract"
# business_suffix = "Implementation"
# low_level_accessors = ["GetSqlCommand", "GetBroker"]
# test_project_suffix = ".Test"
# dal_directory = "DAL.Implementation"

# Rule configurations

[rules.uninitialized-readonly-field]
enabled = true
# severity = "error"  # Override default severity

[rules.dal-low-level-call]
enabled = true
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("strata.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created strata.toml");
    println!("\nNext steps:");
    println!("  1. Edit strata.toml to match your conventions");
    println!("  2. Run: strata check");
    println!("  3. Run: strata generate");

    Ok(())
}
