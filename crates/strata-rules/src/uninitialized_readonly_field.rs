//! Rule to detect readonly fields never injected by a constructor.
//!
//! # Rationale
//!
//! A `readonly` field without an initializer can only receive a value in
//! a constructor. If no constructor ever assigns it (or binds it through
//! an `out` argument), the field keeps its default value forever, which
//! almost always means a missing constructor injection.
//!
//! # Detected Pattern
//!
//! A readonly, uninitialized field whose enclosing class has no
//! constructor assigning it. A single assigning constructor satisfies
//! the field, even when other constructors leave it unset.

use strata_core::source::facts;
use strata_core::source::SyntaxTree;
use strata_core::{Diagnostic, Rule, RuleContext, RuleDescriptor, Severity};
use tree_sitter::Node;

/// Rule code for uninitialized-readonly-field.
pub const CODE: &str = "SL103";

/// Rule name for uninitialized-readonly-field.
pub const NAME: &str = "uninitialized-readonly-field";

/// Descriptor for uninitialized-readonly-field.
pub const DESCRIPTOR: RuleDescriptor = RuleDescriptor {
    code: CODE,
    name: NAME,
    title: "Readonly fields must be initialized or injected in a constructor",
    message: "The readonly field is never initialized",
    category: "design",
    severity: Severity::Warning,
    enabled: true,
};

/// Flags readonly fields never assigned by any constructor.
#[derive(Debug, Clone, Copy, Default)]
pub struct UninitializedReadonlyField;

impl UninitializedReadonlyField {
    /// Creates the rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for UninitializedReadonlyField {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &DESCRIPTOR
    }

    fn node_kinds(&self) -> &'static [&'static str] {
        &["field_declaration"]
    }

    fn check_node(&self, node: Node<'_>, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        if !facts::has_modifier(node, ctx.tree, "readonly") {
            return Vec::new();
        }

        // A field without an enclosing class is a malformed shape:
        // skip the symbol rather than fail the pass.
        let Some(class) = facts::enclosing_class(node) else {
            return Vec::new();
        };
        let constructors = facts::constructors_of(class);

        let mut diagnostics = Vec::new();
        for declarator in facts::declarators_of(node) {
            if facts::has_initializer(declarator) {
                continue;
            }
            let Some(name_node) = facts::name_node(declarator) else {
                continue;
            };
            let field_name = ctx.tree.text(name_node);

            let assigned = constructors
                .iter()
                .any(|ctor| constructor_assigns(*ctor, ctx.tree, field_name));
            if !assigned {
                diagnostics.push(DESCRIPTOR.at(ctx.location(name_node)));
            }
        }
        diagnostics
    }
}

/// Whether a constructor assigns the field, either on the left-hand
/// side of an assignment or through an `out`-mode argument.
fn constructor_assigns(constructor: Node<'_>, tree: &SyntaxTree, field_name: &str) -> bool {
    for node in facts::descendants(constructor) {
        match node.kind() {
            "assignment_expression" => {
                if node
                    .child_by_field_name("left")
                    .is_some_and(|lhs| facts::expr_refers_to_field(lhs, tree, field_name))
                {
                    return true;
                }
            }
            "argument" => {
                if facts::is_out_argument(node)
                    && facts::argument_expression(node)
                        .is_some_and(|expr| facts::expr_refers_to_field(expr, tree, field_name))
                {
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::source::CSharpParser;
    use strata_core::{Conventions, DocumentContext, Engine, SemanticIndex};
    use std::path::Path;

    fn check(source: &str) -> Vec<Diagnostic> {
        let parser = CSharpParser::new();
        let tree = parser.parse(source).expect("parse failed");
        let index = SemanticIndex::from_trees([&tree]);
        let conventions = Conventions::default();
        let document = DocumentContext::new(Path::new("Service.cs"), source, "P", Path::new("."));
        let ctx = RuleContext {
            document: &document,
            tree: &tree,
            index: &index,
            conventions: &conventions,
        };
        let mut engine = Engine::new();
        engine.register(UninitializedReadonlyField::new());
        engine.run(&ctx)
    }

    #[test]
    fn flags_never_assigned_field() {
        let diagnostics = check(
            r"
public class ReferenceService {
    private readonly IAccessor _accessor;

    public ReferenceService(IAccessor other) {
        var unrelated = other;
    }
}
",
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, CODE);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
    }

    #[test]
    fn anchor_is_field_name() {
        let source = r"
public class ReferenceService {
    private readonly IAccessor _accessor;
}
";
        let diagnostics = check(source);
        assert_eq!(diagnostics.len(), 1);
        let loc = &diagnostics[0].location;
        assert_eq!(&source[loc.offset..loc.offset + loc.length], "_accessor");
    }

    #[test]
    fn single_assigning_constructor_satisfies() {
        // Two constructors, only the second assigns: no finding.
        let diagnostics = check(
            r"
public class ReferenceService {
    private readonly IAccessor _accessor;

    public ReferenceService() {
    }

    public ReferenceService(IAccessor accessor) {
        _accessor = accessor;
    }
}
",
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn this_qualified_assignment_satisfies() {
        let diagnostics = check(
            r"
public class ReferenceService {
    private readonly IAccessor _accessor;

    public ReferenceService(IAccessor accessor) {
        this._accessor = accessor;
    }
}
",
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn out_argument_satisfies() {
        let diagnostics = check(
            r"
public class ReferenceService {
    private readonly int _port;

    public ReferenceService(string raw) {
        int.TryParse(raw, out _port);
    }
}
",
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn initializer_satisfies() {
        let diagnostics = check(
            r"
public class ReferenceService {
    private readonly int _limit = 100;
}
",
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn non_readonly_fields_are_ignored() {
        let diagnostics = check(
            r"
public class ReferenceService {
    private IAccessor _accessor;
}
",
        );
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn each_declarator_checked_independently() {
        let diagnostics = check(
            r"
public class ReferenceService {
    private readonly int _a, _b;

    public ReferenceService(int a) {
        _a = a;
    }
}
",
        );
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn unrelated_assignments_do_not_satisfy() {
        let diagnostics = check(
            r"
public class ReferenceService {
    private readonly IAccessor _accessor;

    public ReferenceService(IAccessor accessor) {
        var accessorCopy = accessor;
        accessorCopy = null;
    }
}
",
        );
        assert_eq!(diagnostics.len(), 1);
    }
}
