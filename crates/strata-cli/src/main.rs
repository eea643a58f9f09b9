//! strata CLI tool.
//!
//! Usage:
//! ```bash
//! strata check [OPTIONS] [PATH]
//! strata generate [OPTIONS] [PATH]
//! strata list-rules
//! strata init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use strata_gen::TestStrategy;
use tracing_subscriber::EnvFilter;

mod commands;
mod pipeline;
mod workspace;

/// Architecture linter and unit-test scaffolder for layered C# solutions
#[derive(Parser)]
#[command(name = "strata")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run rule checks over a solution
    Check {
        /// Solution directory or .sln file (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific rules (comma-separated names or codes)
        #[arg(long)]
        rules: Option<String>,

        /// Path segments to exclude (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,
    },

    /// Generate unit-test skeletons for qualifying DAL methods
    Generate {
        /// Solution directory or .sln file (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Content synthesis strategy
        #[arg(short, long, default_value = "semantic")]
        strategy: StrategyArg,
    },

    /// List available rules
    ListRules,

    /// Initialize a strata.toml configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for check results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output, including hidden findings.
    Json,
    /// One-line-per-finding compact format.
    Compact,
}

/// Test synthesis strategy selection.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum StrategyArg {
    /// Arrange/act/assert skeleton.
    #[default]
    Semantic,
    /// Snapshot comparison skeleton.
    Snapshot,
}

impl From<StrategyArg> for TestStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Semantic => Self::Semantic,
            StrategyArg::Snapshot => Self::Snapshot,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Check {
            path,
            format,
            rules,
            exclude,
        } => commands::check::run(&path, format, rules, exclude, cli.config.as_deref()),
        Commands::Generate { path, strategy } => {
            commands::generate::run(&path, strategy.into(), cli.config.as_deref())
        }
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(())
        }
        Commands::Init { force } => commands::init::run(force),
    }
}
