//! Rule trait and dispatch engine.
//!
//! Rules subscribe to syntax node kinds, in the manner of analyzer
//! frameworks that register per-node-kind actions. The engine performs
//! exactly one depth-first traversal per tree and hands each visited
//! node to the rules subscribed to its kind. Any deeper walking (e.g. a
//! class-body scan) happens inside the rule, as a pure function of the
//! node and the [`RuleContext`].

use crate::classify::Conventions;
use crate::context::DocumentContext;
use crate::source::{SemanticIndex, SyntaxTree};
use crate::types::{Diagnostic, Location, RuleDescriptor};
use tree_sitter::Node;

/// Everything a rule may consult while checking a node.
///
/// Shared immutably across one document's traversal; rules must not
/// carry state across documents.
pub struct RuleContext<'a> {
    /// The document being analyzed.
    pub document: &'a DocumentContext<'a>,
    /// The document's syntax tree.
    pub tree: &'a SyntaxTree,
    /// Project-wide type index.
    pub index: &'a SemanticIndex,
    /// Configured conventions.
    pub conventions: &'a Conventions,
}

impl RuleContext<'_> {
    /// Builds a location anchored at a node, relative to the solution root.
    #[must_use]
    pub fn location(&self, node: Node<'_>) -> Location {
        self.tree.location(&self.document.relative_path, node)
    }
}

/// A rule module dispatched by node kind.
pub trait Rule: Send + Sync {
    /// Immutable metadata for this rule.
    fn descriptor(&self) -> &'static RuleDescriptor;

    /// Syntax node kinds this rule subscribes to.
    fn node_kinds(&self) -> &'static [&'static str];

    /// Checks one dispatched node and returns any findings.
    fn check_node(&self, node: Node<'_>, ctx: &RuleContext<'_>) -> Vec<Diagnostic>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

/// Registry and dispatcher for rule modules.
#[derive(Default)]
pub struct Engine {
    rules: Vec<RuleBox>,
}

impl Engine {
    /// Creates an empty engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a rule.
    pub fn register<R: Rule + 'static>(&mut self, rule: R) {
        self.rules.push(Box::new(rule));
    }

    /// Registers a boxed rule.
    pub fn register_box(&mut self, rule: RuleBox) {
        self.rules.push(rule);
    }

    /// Number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Descriptors of all registered rules.
    pub fn descriptors(&self) -> impl Iterator<Item = &'static RuleDescriptor> + '_ {
        self.rules.iter().map(|r| r.descriptor())
    }

    /// Runs all enabled rules over one document in a single depth-first
    /// traversal. Severities are reported as declared by each rule's
    /// descriptor; the engine never alters them.
    #[must_use]
    pub fn run(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        let mut stack = vec![ctx.tree.root()];

        while let Some(node) = stack.pop() {
            for rule in &self.rules {
                if !rule.descriptor().enabled {
                    tracing::debug!("Skipping disabled rule: {}", rule.descriptor().name);
                    continue;
                }
                if rule.node_kinds().contains(&node.kind()) {
                    diagnostics.extend(rule.check_node(node, ctx));
                }
            }
            for i in (0..node.named_child_count()).rev() {
                if let Some(child) = node.named_child(i as u32) {
                    stack.push(child);
                }
            }
        }

        diagnostics
    }
}
