//! C# parsing via Tree-sitter.

use crate::types::Location;
use std::path::Path;
use thiserror::Error;
use tree_sitter::{Language, Node, Parser, Tree};

/// Errors produced while acquiring a syntax tree.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The grammar was rejected by the Tree-sitter runtime.
    #[error("C# grammar rejected by tree-sitter: {0}")]
    Grammar(#[from] tree_sitter::LanguageError),

    /// The parser returned no tree for the document.
    #[error("tree-sitter produced no tree for the document")]
    NoTree,
}

/// Parses C# documents into [`SyntaxTree`]s.
pub struct CSharpParser {
    language: Language,
}

impl CSharpParser {
    /// Creates a parser configured with the C# grammar.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_c_sharp::LANGUAGE.into(),
        }
    }

    /// Parses a document.
    ///
    /// Partial trees with error nodes are returned as-is; analysis is
    /// tolerant of them. Only a wholesale parser failure is an error.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the grammar cannot be loaded or the
    /// parser yields no tree at all.
    pub fn parse(&self, source: impl Into<String>) -> Result<SyntaxTree, ParseError> {
        let source = source.into();
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        let tree = parser
            .parse(source.as_bytes(), None)
            .ok_or(ParseError::NoTree)?;
        Ok(SyntaxTree { source, tree })
    }
}

impl Default for CSharpParser {
    fn default() -> Self {
        Self::new()
    }
}

/// A parsed document: the Tree-sitter tree plus the source it was
/// parsed from. Immutable for the duration of an analysis pass.
pub struct SyntaxTree {
    source: String,
    tree: Tree,
}

impl SyntaxTree {
    /// Root node of the tree.
    #[must_use]
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// The source text this tree was parsed from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Source text covered by a node.
    #[must_use]
    pub fn text(&self, node: Node<'_>) -> &str {
        self.source.get(node.byte_range()).unwrap_or("")
    }

    /// Whether the tree contains any parse error nodes.
    #[must_use]
    pub fn has_parse_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Builds a [`Location`] anchored at a node.
    #[must_use]
    pub fn location(&self, file: &Path, node: Node<'_>) -> Location {
        let start = node.start_position();
        Location::new(file.to_path_buf(), start.row + 1, start.column + 1)
            .with_span(node.start_byte(), node.end_byte() - node.start_byte())
    }
}

impl std::fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("source_len", &self.source.len())
            .field("root_kind", &self.tree.root_node().kind())
            .finish()
    }
}
