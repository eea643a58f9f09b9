//! # strata-core
//!
//! Core framework for strata: the source model adapter, the declaration
//! classifier, and the rule engine.
//!
//! Analysis is a pure pipeline over immutable inputs: a document is
//! parsed into a [`SyntaxTree`](source::SyntaxTree), type declarations
//! are classified into architectural [`Role`](classify::Role)s against a
//! project-wide [`SemanticIndex`](source::SemanticIndex), and registered
//! [`Rule`]s produce [`Diagnostic`]s during a single traversal driven by
//! the [`Engine`]. Nothing in this crate touches the filesystem except
//! [`Config::from_file`].
//!
//! ## Example
//!
//! ```ignore
//! use strata_core::{classify, CSharpParser, Conventions, Engine, SemanticIndex};
//!
//! let parser = CSharpParser::new();
//! let tree = parser.parse(source)?;
//! let index = SemanticIndex::from_trees([&tree]);
//! let roles = classify::classify("DalReference", &index, &Conventions::default());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod classify;
mod config;
mod context;
mod rule;
pub mod source;
mod types;

pub use classify::{Conventions, Role};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::DocumentContext;
pub use rule::{Engine, Rule, RuleBox, RuleContext};
pub use source::{CSharpParser, ParseError, SemanticIndex, SyntaxTree};
pub use types::{AnalysisResult, Diagnostic, DiagnosticReport, Location, RuleDescriptor, Severity};
