//! # strata-gen
//!
//! Unit-test artifact generation for DAL methods.
//!
//! A method qualifies when its enclosing class is a DAL implementation,
//! the method is public, and the shared low-level-accessor evaluation
//! from `strata-rules` reports a deny-listed call in its body. Qualifying
//! methods are turned into [`GeneratedArtifact`]s: a deterministic file
//! name, a folder derived from the enclosing class, and the full MSTest
//! source text. Writing artifacts (and checking for existing ones) is
//! the orchestration pipeline's job; this crate never touches the
//! filesystem.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod template;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strata_core::classify::{self, Role};
use strata_core::source::facts;
use strata_core::{Conventions, SemanticIndex, SyntaxTree};
use strata_rules::dal_low_level_call::method_uses_low_level_accessor;
use tree_sitter::Node;

pub use template::TestTemplate;

/// Content-synthesis policy for generated tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStrategy {
    /// Arrange/act/assert skeleton asserting on the shape of the result.
    #[default]
    Semantic,
    /// Act + serialized-output comparison against a stored snapshot.
    Snapshot,
}

impl std::fmt::Display for TestStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Semantic => write!(f, "semantic"),
            Self::Snapshot => write!(f, "snapshot"),
        }
    }
}

impl std::str::FromStr for TestStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "semantic" => Ok(Self::Semantic),
            "snapshot" => Ok(Self::Snapshot),
            other => Err(format!("unknown test strategy: {other}")),
        }
    }
}

/// A test source file to be materialized: name, folder, and full text.
///
/// Plain data, no filesystem knowledge. Written at most once per
/// (folder, file name) pair by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedArtifact {
    /// Target file name (e.g. `DalReference_LoadReferenceListTest.cs`).
    pub file_name: String,
    /// Target folder, relative to the test project directory.
    pub folder: String,
    /// Full file content.
    pub content: String,
}

/// Whether a method qualifies for test generation: DAL class, public
/// method, and a low-level accessor call in the body (the same
/// evaluation the `dal-low-level-call` rule performs).
#[must_use]
pub fn is_candidate(
    method: Node<'_>,
    class: Node<'_>,
    tree: &SyntaxTree,
    index: &SemanticIndex,
    conventions: &Conventions,
) -> bool {
    let Some(class_name) = facts::declared_name(class, tree) else {
        return false;
    };
    if !classify::classify(&class_name, index, conventions)
        .contains(&Role::DataAccessImplementation)
    {
        return false;
    }
    facts::is_public(method, tree) && method_uses_low_level_accessor(method, tree, conventions)
}

/// Qualifying methods of a class, deduplicated by canonical signature so
/// that overloads collapsing onto one destination generate only once.
#[must_use]
pub fn eligible_methods<'t>(
    class: Node<'t>,
    tree: &SyntaxTree,
    index: &SemanticIndex,
    conventions: &Conventions,
) -> Vec<Node<'t>> {
    let mut seen = HashSet::new();
    let mut methods = Vec::new();
    for method in facts::methods_of(class) {
        if !is_candidate(method, class, tree, index, conventions) {
            continue;
        }
        let Some(signature) = facts::signature_of(method, tree) else {
            continue;
        };
        if !seen.insert(signature) {
            tracing::debug!("Skipping duplicate signature in test generation");
            continue;
        }
        methods.push(method);
    }
    methods
}

/// Synthesizes the test artifact for one qualifying method.
///
/// The file name is deterministic from class + method identity, the
/// folder is the enclosing class name, and the content is byte-identical
/// across runs for identical inputs. Returns `None` when the class or
/// method name cannot be extracted (malformed source).
#[must_use]
pub fn generate(
    method: Node<'_>,
    class: Node<'_>,
    strategy: TestStrategy,
    tree: &SyntaxTree,
    test_project: &str,
) -> Option<GeneratedArtifact> {
    let class_name = facts::declared_name(class, tree)?;
    let method_name = facts::declared_name(method, tree)?;
    let parameters = facts::parameters_of(method, tree);
    let returns_value = facts::signature_of(method, tree)
        .is_some_and(|signature| signature.return_type != "void");

    let content = template::render(
        &TestTemplate {
            test_project,
            class_name: &class_name,
            method_name: &method_name,
            parameters: &parameters,
            returns_value,
        },
        strategy,
    );

    Some(GeneratedArtifact {
        file_name: format!("{class_name}_{method_name}Test.cs"),
        folder: class_name,
        content,
    })
}
