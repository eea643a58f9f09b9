//! Rule to detect DAL methods reaching low-level persistence accessors.
//!
//! # Rationale
//!
//! Data-access methods that call a low-level accessor (`GetSqlCommand`,
//! `GetBroker`) are the ones that actually hit the database, which makes
//! them candidates for generated unit-test coverage. The finding is
//! `Hidden`: it is an eligibility signal for the test generator, not a
//! warning shown to users.
//!
//! # Detected Pattern
//!
//! A class classified as a DAL implementation containing a method whose
//! body invokes a deny-listed accessor, directly or through a member
//! access. One finding per method, anchored at the method name; the
//! remainder of a matched method is not scanned.

use strata_core::classify::{self, Role};
use strata_core::source::facts;
use strata_core::source::SyntaxTree;
use strata_core::{Conventions, Diagnostic, Rule, RuleContext, RuleDescriptor, Severity};
use tree_sitter::Node;

/// Rule code for dal-low-level-call.
pub const CODE: &str = "SL300";

/// Rule name for dal-low-level-call.
pub const NAME: &str = "dal-low-level-call";

/// Descriptor for dal-low-level-call.
pub const DESCRIPTOR: RuleDescriptor = RuleDescriptor {
    code: CODE,
    name: NAME,
    title: "DAL method uses a low-level accessor",
    message: "The method invokes a low-level persistence accessor",
    category: "coverage",
    severity: Severity::Hidden,
    enabled: true,
};

/// Flags DAL methods that invoke deny-listed low-level accessors.
#[derive(Debug, Clone, Copy, Default)]
pub struct DalLowLevelCall;

impl DalLowLevelCall {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for DalLowLevelCall {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &DESCRIPTOR
    }

    fn node_kinds(&self) -> &'static [&'static str] {
        &["class_declaration"]
    }

    fn check_node(&self, node: Node<'_>, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let Some(class_name) = facts::declared_name(node, ctx.tree) else {
            return Vec::new();
        };

        let roles = classify::classify(&class_name, ctx.index, ctx.conventions);
        if !roles.contains(&Role::DataAccessImplementation) {
            return Vec::new();
        }

        let mut diagnostics = Vec::new();
        for method in facts::methods_of(node) {
            if !method_uses_low_level_accessor(method, ctx.tree, ctx.conventions) {
                continue;
            }
            let anchor = facts::name_node(method).unwrap_or(method);
            diagnostics.push(DESCRIPTOR.at(ctx.location(anchor)));
        }
        diagnostics
    }
}

/// Whether a method body contains a call to a deny-listed low-level
/// accessor.
///
/// This is the single evaluation shared by the rule and the test
/// generator's eligibility check: the deny-list lives in
/// [`Conventions::low_level_accessors`] and changes flow to both.
#[must_use]
pub fn method_uses_low_level_accessor(
    method: Node<'_>,
    tree: &SyntaxTree,
    conventions: &Conventions,
) -> bool {
    first_low_level_call(method, tree, conventions).is_some()
}

/// First deny-listed invocation in a method, depth-first. Scanning stops
/// at the first match; non-matching calls are descended into normally.
fn first_low_level_call<'t>(
    method: Node<'t>,
    tree: &SyntaxTree,
    conventions: &Conventions,
) -> Option<Node<'t>> {
    facts::descendants(method).find(|node| {
        node.kind() == "invocation_expression"
            && facts::invoked_simple_name(*node, tree)
                .is_some_and(|name| conventions.is_low_level_accessor(&name))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::source::CSharpParser;
    use strata_core::{DocumentContext, Engine, SemanticIndex};
    use std::path::Path;

    fn check(source: &str) -> Vec<Diagnostic> {
        let parser = CSharpParser::new();
        let tree = parser.parse(source).expect("parse failed");
        let index = SemanticIndex::from_trees([&tree]);
        let conventions = Conventions::default();
        let document = DocumentContext::new(Path::new("DalReference.cs"), source, "P", Path::new("."));
        let ctx = RuleContext {
            document: &document,
            tree: &tree,
            index: &index,
            conventions: &conventions,
        };
        let mut engine = Engine::new();
        engine.register(DalLowLevelCall::new());
        engine.run(&ctx)
    }

    #[test]
    fn flags_method_with_accessor_call() {
        let diagnostics = check(
            r"
[RegisterImpl]
public class DalReference {
    public object LoadReferenceList() {
        return this.GetBroker<Reference>().FindAll();
    }
}
",
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, CODE);
        assert_eq!(diagnostics[0].severity, Severity::Hidden);
    }

    #[test]
    fn short_circuits_after_first_match() {
        // Two deny-listed calls in one method: exactly one finding,
        // anchored at the method name.
        let diagnostics = check(
            r#"
[RegisterImpl]
public class DalReference {
    public object LoadEverything() {
        var broker = GetBroker<Reference>();
        var command = GetSqlCommand("SELECT 1");
        return broker;
    }
}
"#,
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].location.line, 4);
    }

    #[test]
    fn one_finding_per_matching_method() {
        let diagnostics = check(
            r"
[RegisterImpl]
public class DalReference {
    public object LoadA() { return GetBroker<A>(); }
    public object LoadB() { return GetSqlCommand(query); }
    public int Count() { return 0; }
}
",
        );
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn ignores_non_denylisted_calls() {
        let diagnostics = check(
            r"
[RegisterImpl]
public class DalReference {
    public object LoadReferenceList() {
        return this.GetCache().FindAll();
    }
}
",
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn ignores_unclassified_classes() {
        // No RegisterImpl marker: not a DAL, regardless of method bodies.
        let diagnostics = check(
            r"
public class DalReference {
    public object LoadReferenceList() {
        return GetBroker<Reference>().FindAll();
    }
}
",
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn reserved_base_name_needs_no_marker() {
        let diagnostics = check(
            r"
public class AbstractDal {
    public object Open() { return GetSqlCommand(query); }
}
",
        );
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn anchor_is_method_name_span() {
        let source = r"
[RegisterImpl]
public class DalReference {
    public object Load() { return GetBroker<A>(); }
}
";
        let diagnostics = check(source);
        assert_eq!(diagnostics.len(), 1);
        let loc = &diagnostics[0].location;
        let anchored = &source[loc.offset..loc.offset + loc.length];
        assert_eq!(anchored, "Load");
    }
}
