//! Core types for diagnostics and analysis results.

use miette::{Diagnostic as MietteDiagnostic, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for diagnostics.
///
/// `Hidden` findings are machine-consumed signals (e.g. test-generation
/// eligibility) and are never shown in human-readable output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Not surfaced to users; consumed by other components.
    Hidden,
    /// Informational message, does not fail a check.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hidden => write!(f, "hidden"),
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to the solution root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
    /// Byte offset in the file (for miette integration).
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Location {
    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    /// Sets the byte offset and length for this location.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }
}

/// Immutable metadata describing a rule.
///
/// One `const` instance per rule module; diagnostics are created from it
/// so that id, category, and severity stay in a single place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleDescriptor {
    /// Rule code (e.g., "SL300").
    pub code: &'static str,
    /// Kebab-case rule name (e.g., "dal-low-level-call").
    pub name: &'static str,
    /// Short human-readable title.
    pub title: &'static str,
    /// Message template reported on each finding.
    pub message: &'static str,
    /// Category grouping (e.g., "design", "coverage").
    pub category: &'static str,
    /// Default severity for findings from this rule.
    pub severity: Severity,
    /// Whether the rule runs unless configuration says otherwise.
    pub enabled: bool,
}

impl RuleDescriptor {
    /// Creates a diagnostic instance of this descriptor at a location,
    /// using the descriptor's message template.
    #[must_use]
    pub fn at(&self, location: Location) -> Diagnostic {
        Diagnostic {
            code: self.code.to_string(),
            rule: self.name.to_string(),
            category: self.category.to_string(),
            severity: self.severity,
            location,
            message: self.message.to_string(),
        }
    }
}

/// A single finding produced by a rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Rule code (e.g., "SL300").
    pub code: String,
    /// Rule name (e.g., "dal-low-level-call").
    pub rule: String,
    /// Category grouping (e.g., "coverage").
    pub category: String,
    /// Severity of this finding.
    pub severity: Severity,
    /// Primary location of the finding.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
}

impl Diagnostic {
    /// Replaces the message with a formatted one.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Whether this finding should appear in human-readable output.
    #[must_use]
    pub fn is_surfaced(&self) -> bool {
        self.severity > Severity::Hidden
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.code,
            self.message
        )
    }
}

/// Converts a Diagnostic to a miette diagnostic for rich display.
#[allow(dead_code)] // Public API for miette integration
#[derive(Debug, thiserror::Error, MietteDiagnostic)]
#[error("{message}")]
pub struct DiagnosticReport {
    message: String,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl From<&Diagnostic> for DiagnosticReport {
    fn from(d: &Diagnostic) -> Self {
        Self {
            message: format!("[{}] {}", d.code, d.message),
            span: SourceSpan::from((d.location.offset, d.location.length)),
            label_message: d.rule.clone(),
        }
    }
}

/// Aggregated result of an analysis run.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// All diagnostics found, including hidden ones.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of documents analyzed.
    pub documents_checked: usize,
}

impl AnalysisResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any error-severity findings.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Findings that should be shown to users (everything above Hidden).
    pub fn surfaced(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_surfaced())
    }

    /// Counts surfaced findings by severity: (errors, warnings, infos).
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let mut errors = 0;
        let mut warnings = 0;
        let mut infos = 0;
        for d in &self.diagnostics {
            match d.severity {
                Severity::Error => errors += 1,
                Severity::Warning => warnings += 1,
                Severity::Info => infos += 1,
                Severity::Hidden => {}
            }
        }
        (errors, warnings, infos)
    }

    /// Checks if any findings meet or exceed the given severity.
    #[must_use]
    pub fn has_diagnostics_at(&self, severity: Severity) -> bool {
        self.diagnostics.iter().any(|d| d.severity >= severity)
    }

    /// Sorts findings by file, then line, then column.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then(a.location.line.cmp(&b.location.line))
                .then(a.location.column.cmp(&b.location.column))
        });
    }

    /// Adds findings from another result.
    pub fn extend(&mut self, other: Self) {
        self.diagnostics.extend(other.diagnostics);
        self.documents_checked += other.documents_checked;
    }
}
