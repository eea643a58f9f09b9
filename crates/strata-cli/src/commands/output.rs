//! Shared output formatting for analysis results.

use anyhow::Result;
use strata_core::{AnalysisResult, Severity};

use crate::OutputFormat;

/// Print analysis results in the specified format.
///
/// Hidden findings are machine-consumed signals and appear only in JSON.
pub fn print(result: &AnalysisResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
    }
    Ok(())
}

fn print_text(result: &AnalysisResult) {
    let (errors, warnings, infos) = result.count_by_severity();

    for diagnostic in result.surfaced() {
        let severity_indicator = match diagnostic.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info | Severity::Hidden => "\x1b[34minfo\x1b[0m",
        };

        println!(
            "{} {} at {}:{}:{}",
            diagnostic.code,
            diagnostic.rule,
            diagnostic.location.file.display(),
            diagnostic.location.line,
            diagnostic.location.column,
        );
        println!("  {}: {}", severity_indicator, diagnostic.message);
        println!();
    }

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s), {} info(s) in {} document(s)\x1b[0m",
        summary_color, errors, warnings, infos, result.documents_checked
    );
}

fn print_json(result: &AnalysisResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &AnalysisResult) {
    for diagnostic in result.surfaced() {
        println!(
            "{}:{}:{}: {} [{}] {}",
            diagnostic.location.file.display(),
            diagnostic.location.line,
            diagnostic.location.column,
            diagnostic.severity,
            diagnostic.code,
            diagnostic.message,
        );
    }
}
