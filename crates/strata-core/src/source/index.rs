//! Project-wide type index.
//!
//! Built once per project from every parsed document, then shared
//! read-only by all per-document analyses. Resolution is name-based:
//! type symbols are keyed by simple name, which matches the analyzed
//! codebases' one-type-per-name convention.

use super::facts;
use super::parser::SyntaxTree;
use std::collections::{BTreeMap, BTreeSet};

/// Kind of an indexed type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// A class declaration.
    Class,
    /// An interface declaration.
    Interface,
}

/// Facts recorded for one indexed type.
#[derive(Debug, Clone)]
pub struct TypeEntry {
    /// Declaration kind.
    pub kind: TypeKind,
    /// Normalized marker attribute names on the declaration.
    pub attributes: BTreeSet<String>,
    /// Simple names of listed base types, in source order.
    pub bases: Vec<String>,
}

/// Symbol table for one project.
#[derive(Debug, Default)]
pub struct SemanticIndex {
    types: BTreeMap<String, TypeEntry>,
}

impl SemanticIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index from a set of parsed documents.
    #[must_use]
    pub fn from_trees<'a>(trees: impl IntoIterator<Item = &'a SyntaxTree>) -> Self {
        let mut index = Self::new();
        for tree in trees {
            index.add_document(tree);
        }
        index
    }

    /// Records every class and interface declaration of a document.
    pub fn add_document(&mut self, tree: &SyntaxTree) {
        for node in facts::descendants(tree.root()) {
            let kind = match node.kind() {
                "class_declaration" => TypeKind::Class,
                "interface_declaration" => TypeKind::Interface,
                _ => continue,
            };
            let Some(name) = facts::declared_name(node, tree) else {
                continue;
            };
            let entry = TypeEntry {
                kind,
                attributes: facts::attributes_of(node, tree).into_iter().collect(),
                bases: facts::base_names_of(node, tree),
            };
            self.types.insert(name, entry);
        }
    }

    /// Looks up a type by simple name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypeEntry> {
        self.types.get(name)
    }

    /// Whether a type carries a normalized attribute.
    #[must_use]
    pub fn has_attribute(&self, name: &str, attribute: &str) -> bool {
        self.get(name)
            .is_some_and(|entry| entry.attributes.contains(attribute))
    }

    /// All interfaces a type transitively implements, resolved through
    /// base classes and super-interfaces known to the index. Unknown
    /// base names contribute nothing.
    #[must_use]
    pub fn all_interfaces(&self, name: &str) -> BTreeSet<String> {
        let mut interfaces = BTreeSet::new();
        let mut visited = BTreeSet::new();
        let mut queue: Vec<String> = self
            .get(name)
            .map(|entry| entry.bases.clone())
            .unwrap_or_default();

        while let Some(base) = queue.pop() {
            if !visited.insert(base.clone()) {
                continue;
            }
            let Some(entry) = self.get(&base) else {
                continue;
            };
            if entry.kind == TypeKind::Interface {
                interfaces.insert(base);
            }
            queue.extend(entry.bases.iter().cloned());
        }

        interfaces
    }

    /// Number of indexed types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the index holds no types.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
