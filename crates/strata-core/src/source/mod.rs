//! Source model adapter over Tree-sitter.
//!
//! This module is the only place that talks to the parser. Everything the
//! classifier and rules need is exposed as plain data: a [`SyntaxTree`]
//! per document, pure fact-extraction helpers in [`facts`], and the
//! per-project [`SemanticIndex`] for name-based symbol lookup.

pub mod facts;
mod index;
mod parser;

pub use index::{SemanticIndex, TypeEntry, TypeKind};
pub use parser::{CSharpParser, ParseError, SyntaxTree};
