//! Pure fact extraction over syntax nodes.
//!
//! Everything here is a function of (node, tree) with no side effects.
//! Helpers tolerate malformed shapes by returning `None`/empty rather
//! than panicking; rules treat those as "no match".

use super::parser::SyntaxTree;
use tree_sitter::Node;

/// Modifier keywords recognized on declarations.
const MODIFIER_KEYWORDS: &[&str] = &[
    "public", "private", "protected", "internal", "static", "readonly", "const", "sealed",
    "abstract", "virtual", "override", "async", "partial", "new", "extern", "volatile",
    "required",
];

/// Node kinds that denote a type reference.
const TYPE_KINDS: &[&str] = &[
    "predefined_type",
    "identifier",
    "qualified_name",
    "generic_name",
    "array_type",
    "nullable_type",
    "tuple_type",
    "pointer_type",
];

/// Pre-order traversal of a node and all its descendants.
pub struct Descendants<'t> {
    stack: Vec<Node<'t>>,
}

impl<'t> Iterator for Descendants<'t> {
    type Item = Node<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        for i in (0..node.named_child_count()).rev() {
            if let Some(child) = node.named_child(i as u32) {
                self.stack.push(child);
            }
        }
        Some(node)
    }
}

/// Iterates a node and its named descendants depth-first.
#[must_use]
pub fn descendants(node: Node<'_>) -> Descendants<'_> {
    Descendants { stack: vec![node] }
}

/// The name identifier node of a declaration, if any.
///
/// Prefers the grammar's `name` field and falls back to the first
/// `identifier` child for node shapes without one.
#[must_use]
pub fn name_node<'t>(node: Node<'t>) -> Option<Node<'t>> {
    node.child_by_field_name("name").or_else(|| {
        let mut cursor = node.walk();
        let found = node.children(&mut cursor)
            .find(|c| c.kind() == "identifier");
        found
    })
}

/// The declared simple name of a declaration node.
#[must_use]
pub fn declared_name(node: Node<'_>, tree: &SyntaxTree) -> Option<String> {
    name_node(node).map(|n| tree.text(n).to_string())
}

/// Modifier keywords present on a declaration, in source order.
#[must_use]
pub fn modifiers_of(node: Node<'_>, tree: &SyntaxTree) -> Vec<String> {
    let mut modifiers = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        let kind = child.kind();
        if kind == "modifier" {
            modifiers.push(tree.text(child).to_string());
        } else if MODIFIER_KEYWORDS.contains(&kind) {
            modifiers.push(kind.to_string());
        }
    }
    modifiers
}

/// Whether a declaration carries a given modifier keyword.
#[must_use]
pub fn has_modifier(node: Node<'_>, tree: &SyntaxTree, modifier: &str) -> bool {
    modifiers_of(node, tree).iter().any(|m| m == modifier)
}

/// Whether a member declaration is public.
#[must_use]
pub fn is_public(node: Node<'_>, tree: &SyntaxTree) -> bool {
    has_modifier(node, tree, "public")
}

/// Normalizes a raw attribute name to its canonical simple form.
///
/// `Chaine.Services.Annotations.RegisterImplAttribute`, `RegisterImplAttribute`
/// and `RegisterImpl` all normalize to `RegisterImpl`.
#[must_use]
pub fn normalize_attribute(raw: &str) -> String {
    let simple = raw.rsplit('.').next().unwrap_or(raw);
    let simple = simple.split('<').next().unwrap_or(simple).trim();
    match simple.strip_suffix("Attribute") {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => simple.to_string(),
    }
}

/// Normalized attribute names attached to a declaration.
#[must_use]
pub fn attributes_of(node: Node<'_>, tree: &SyntaxTree) -> Vec<String> {
    let mut attributes = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() != "attribute_list" {
            continue;
        }
        let mut list_cursor = child.walk();
        for attr in child.named_children(&mut list_cursor) {
            if attr.kind() != "attribute" {
                continue;
            }
            if let Some(name) = attr.named_child(0) {
                attributes.push(normalize_attribute(tree.text(name)));
            }
        }
    }
    attributes
}

/// Reduces a type reference to its simple name: the last dot segment,
/// stripped of generic arguments.
#[must_use]
pub fn simple_type_name(raw: &str) -> String {
    let no_generics = raw.split('<').next().unwrap_or(raw);
    no_generics
        .rsplit('.')
        .next()
        .unwrap_or(no_generics)
        .trim()
        .to_string()
}

/// Simple names of the base types listed on a class or interface
/// declaration, in source order.
#[must_use]
pub fn base_names_of(type_node: Node<'_>, tree: &SyntaxTree) -> Vec<String> {
    let mut bases = Vec::new();
    let mut cursor = type_node.walk();
    for child in type_node.children(&mut cursor) {
        if child.kind() != "base_list" {
            continue;
        }
        let mut base_cursor = child.walk();
        for base in child.named_children(&mut base_cursor) {
            if TYPE_KINDS.contains(&base.kind()) {
                bases.push(simple_type_name(tree.text(base)));
            }
        }
    }
    bases
}

/// Fully qualified namespace enclosing a declaration, outermost first.
#[must_use]
pub fn namespace_of(node: Node<'_>, tree: &SyntaxTree) -> Option<String> {
    let mut segments = Vec::new();
    let mut current = node.parent();
    while let Some(parent) = current {
        if matches!(
            parent.kind(),
            "namespace_declaration" | "file_scoped_namespace_declaration"
        ) {
            if let Some(name) = parent.child_by_field_name("name") {
                segments.push(tree.text(name).to_string());
            }
        }
        current = parent.parent();
    }
    if segments.is_empty() {
        return None;
    }
    segments.reverse();
    Some(segments.join("."))
}

/// Nearest enclosing class declaration, if any.
#[must_use]
pub fn enclosing_class(node: Node<'_>) -> Option<Node<'_>> {
    let mut current = node.parent();
    while let Some(parent) = current {
        if parent.kind() == "class_declaration" {
            return Some(parent);
        }
        current = parent.parent();
    }
    None
}

/// Method declarations within a class body, including nested ones.
#[must_use]
pub fn methods_of(class_node: Node<'_>) -> Vec<Node<'_>> {
    descendants(class_node)
        .filter(|n| n.kind() == "method_declaration")
        .collect()
}

/// Constructors declared directly in a class body.
///
/// Constructors of nested classes are deliberately excluded.
#[must_use]
pub fn constructors_of(class_node: Node<'_>) -> Vec<Node<'_>> {
    let Some(body) = class_node.child_by_field_name("body") else {
        return Vec::new();
    };
    let mut constructors = Vec::new();
    let mut cursor = body.walk();
    for child in body.named_children(&mut cursor) {
        if child.kind() == "constructor_declaration" {
            constructors.push(child);
        }
    }
    constructors
}

/// Variable declarators of a field declaration.
#[must_use]
pub fn declarators_of(field_decl: Node<'_>) -> Vec<Node<'_>> {
    let mut declarators = Vec::new();
    let mut cursor = field_decl.walk();
    for child in field_decl.named_children(&mut cursor) {
        if child.kind() != "variable_declaration" {
            continue;
        }
        let mut var_cursor = child.walk();
        for declarator in child.named_children(&mut var_cursor) {
            if declarator.kind() == "variable_declarator" {
                declarators.push(declarator);
            }
        }
    }
    declarators
}

/// Whether a variable declarator carries an initializer (`= expr`).
#[must_use]
pub fn has_initializer(declarator: Node<'_>) -> bool {
    let mut cursor = declarator.walk();
    let found = declarator
        .children(&mut cursor)
        .any(|c| c.kind() == "=" || c.kind() == "equals_value_clause");
    found
}

/// Simple name of the member invoked by an invocation expression.
///
/// `GetBroker<T>()`, `this.GetBroker()` and `Helper.GetBroker()` all
/// resolve to `GetBroker`.
#[must_use]
pub fn invoked_simple_name(invocation: Node<'_>, tree: &SyntaxTree) -> Option<String> {
    let function = invocation.child_by_field_name("function")?;
    let name_node = match function.kind() {
        "identifier" | "generic_name" => function,
        "member_access_expression" => function.child_by_field_name("name")?,
        _ => return None,
    };
    Some(simple_type_name(tree.text(name_node)))
}

/// Whether an expression refers to a field of the enclosing class:
/// either a bare identifier or a `this.`-qualified access.
#[must_use]
pub fn expr_refers_to_field(expr: Node<'_>, tree: &SyntaxTree, field_name: &str) -> bool {
    match expr.kind() {
        "identifier" => tree.text(expr) == field_name,
        "member_access_expression" => {
            let this_qualified = expr
                .child_by_field_name("expression")
                .is_some_and(|e| e.kind() == "this_expression");
            let name_matches = expr
                .child_by_field_name("name")
                .is_some_and(|n| tree.text(n) == field_name);
            this_qualified && name_matches
        }
        _ => false,
    }
}

/// Whether an argument node is passed in `out` mode.
#[must_use]
pub fn is_out_argument(argument: Node<'_>) -> bool {
    let mut cursor = argument.walk();
    let found = argument.children(&mut cursor).any(|c| c.kind() == "out");
    found
}

/// The expression carried by an argument node.
#[must_use]
pub fn argument_expression(argument: Node<'_>) -> Option<Node<'_>> {
    let mut last = None;
    let mut cursor = argument.walk();
    for child in argument.named_children(&mut cursor) {
        if child.kind() != "name_colon" {
            last = Some(child);
        }
    }
    last
}

/// Canonical method signature: name, return type, and the ordered
/// parameter type list. Structural equality, no string formatting of
/// whole signatures.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    /// Method name.
    pub name: String,
    /// Normalized return type text.
    pub return_type: String,
    /// Normalized parameter types, in declaration order.
    pub parameters: Vec<String>,
}

/// Collapses whitespace in a type reference so structurally identical
/// types compare equal regardless of formatting.
fn normalize_type_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Return type node of a method declaration.
fn return_type_node(method: Node<'_>) -> Option<Node<'_>> {
    if let Some(node) = method
        .child_by_field_name("returns")
        .or_else(|| method.child_by_field_name("type"))
    {
        return Some(node);
    }

    // Fallback: the last type-shaped child before the name identifier.
    let name = name_node(method)?;
    let mut candidate = None;
    let mut cursor = method.walk();
    for child in method.children(&mut cursor) {
        if child.id() == name.id() {
            break;
        }
        if TYPE_KINDS.contains(&child.kind()) || child.kind() == "void_keyword" {
            candidate = Some(child);
        }
    }
    candidate
}

/// Typed parameters of a method: (type, name) pairs in order.
///
/// Parameters with no resolvable type (malformed source) are skipped.
#[must_use]
pub fn parameters_of(method: Node<'_>, tree: &SyntaxTree) -> Vec<(String, String)> {
    let Some(list) = method.child_by_field_name("parameters") else {
        return Vec::new();
    };
    let mut parameters = Vec::new();
    let mut cursor = list.walk();
    for param in list.named_children(&mut cursor) {
        if param.kind() != "parameter" {
            continue;
        }
        let ty = param
            .child_by_field_name("type")
            .or_else(|| {
                let mut p_cursor = param.walk();
                let found = param
                    .named_children(&mut p_cursor)
                    .find(|c| TYPE_KINDS.contains(&c.kind()));
                found
            })
            .map(|t| normalize_type_text(tree.text(t)));
        let name = name_node(param).map(|n| tree.text(n).to_string());
        if let (Some(ty), Some(name)) = (ty, name) {
            parameters.push((ty, name));
        }
    }
    parameters
}

/// Canonical signature of a method declaration.
#[must_use]
pub fn signature_of(method: Node<'_>, tree: &SyntaxTree) -> Option<MethodSignature> {
    let name = declared_name(method, tree)?;
    let return_type = return_type_node(method)
        .map(|n| normalize_type_text(tree.text(n)))
        .unwrap_or_else(|| "void".to_string());
    let parameters = parameters_of(method, tree)
        .into_iter()
        .map(|(ty, _)| ty)
        .collect();
    Some(MethodSignature {
        name,
        return_type,
        parameters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::CSharpParser;

    fn parse(source: &str) -> SyntaxTree {
        CSharpParser::new().parse(source).expect("parse failed")
    }

    fn first_of<'t>(tree: &'t SyntaxTree, kind: &str) -> Node<'t> {
        descendants(tree.root())
            .find(|n| n.kind() == kind)
            .unwrap_or_else(|| panic!("no {kind} in source"))
    }

    #[test]
    fn declared_name_of_class() {
        let tree = parse("public class DalReference { }");
        let class = first_of(&tree, "class_declaration");
        assert_eq!(declared_name(class, &tree).as_deref(), Some("DalReference"));
    }

    #[test]
    fn modifiers_are_collected() {
        let tree = parse("class C { private readonly int _count; }");
        let field = first_of(&tree, "field_declaration");
        assert!(has_modifier(field, &tree, "readonly"));
        assert!(has_modifier(field, &tree, "private"));
        assert!(!is_public(field, &tree));
    }

    #[test]
    fn attribute_normalization() {
        assert_eq!(normalize_attribute("RegisterImpl"), "RegisterImpl");
        assert_eq!(normalize_attribute("RegisterImplAttribute"), "RegisterImpl");
        assert_eq!(
            normalize_attribute("Chaine.Services.Annotations.RegisterImplAttribute"),
            "RegisterImpl"
        );
        // A bare "Attribute" is kept, not stripped to nothing.
        assert_eq!(normalize_attribute("Attribute"), "Attribute");
    }

    #[test]
    fn attributes_of_class() {
        let tree = parse("[RegisterImpl]\n[Obsolete(\"old\")]\npublic class DalReference { }");
        let class = first_of(&tree, "class_declaration");
        let attrs = attributes_of(class, &tree);
        assert_eq!(attrs, vec!["RegisterImpl".to_string(), "Obsolete".to_string()]);
    }

    #[test]
    fn base_names_strip_namespaces_and_generics() {
        let tree = parse(
            "class DalReference : Chaine.Broker.AbstractDal, IReferenceAccessor<Item> { }",
        );
        let class = first_of(&tree, "class_declaration");
        assert_eq!(
            base_names_of(class, &tree),
            vec!["AbstractDal".to_string(), "IReferenceAccessor".to_string()]
        );
    }

    #[test]
    fn namespace_of_nested_declaration() {
        let tree = parse("namespace Chaine.Referentiel {\n class DalReference { }\n}");
        let class = first_of(&tree, "class_declaration");
        assert_eq!(
            namespace_of(class, &tree).as_deref(),
            Some("Chaine.Referentiel")
        );
    }

    #[test]
    fn constructors_exclude_nested_classes() {
        let tree = parse(
            "class Outer {\n  public Outer() { }\n  class Inner { public Inner() { } }\n}",
        );
        let class = first_of(&tree, "class_declaration");
        assert_eq!(constructors_of(class).len(), 1);
    }

    #[test]
    fn declarator_initializer_detection() {
        let tree = parse("class C { readonly int _a = 3; readonly int _b; }");
        let class = first_of(&tree, "class_declaration");
        let fields: Vec<_> = descendants(class)
            .filter(|n| n.kind() == "field_declaration")
            .collect();
        assert_eq!(fields.len(), 2);
        let a = &declarators_of(fields[0])[0];
        let b = &declarators_of(fields[1])[0];
        assert!(has_initializer(*a));
        assert!(!has_initializer(*b));
    }

    #[test]
    fn invoked_name_through_member_access() {
        let tree = parse(
            "class C { void M() { this.GetBroker<Item>().Load(); Helper.GetSqlCommand(\"q\"); } }",
        );
        let invocations: Vec<_> = descendants(tree.root())
            .filter(|n| n.kind() == "invocation_expression")
            .collect();
        let names: Vec<_> = invocations
            .iter()
            .filter_map(|n| invoked_simple_name(*n, &tree))
            .collect();
        assert!(names.contains(&"GetBroker".to_string()));
        assert!(names.contains(&"GetSqlCommand".to_string()));
        assert!(names.contains(&"Load".to_string()));
    }

    #[test]
    fn field_reference_detection() {
        let tree = parse("class C { int _f; C(int f) { this._f = f; _f = f; other = f; } }");
        let assignments: Vec<_> = descendants(tree.root())
            .filter(|n| n.kind() == "assignment_expression")
            .collect();
        let matching = assignments
            .iter()
            .filter_map(|a| a.child_by_field_name("left"))
            .filter(|lhs| expr_refers_to_field(*lhs, &tree, "_f"))
            .count();
        assert_eq!(matching, 2);
    }

    #[test]
    fn out_argument_detection() {
        let tree = parse("class C { void M() { Parse(text, out _value); Parse(text, _value); } }");
        let arguments: Vec<_> = descendants(tree.root())
            .filter(|n| n.kind() == "argument")
            .collect();
        let out_args = arguments.iter().filter(|a| is_out_argument(**a)).count();
        assert_eq!(out_args, 1);
    }

    #[test]
    fn signature_is_structural() {
        let tree = parse(
            "class C {\n  public IList<Item> Load(int id, string name) { return null; }\n  public IList<Item> Load(int  id, string  name) { return null; }\n}",
        );
        let class = first_of(&tree, "class_declaration");
        let methods = methods_of(class);
        assert_eq!(methods.len(), 2);
        let a = signature_of(methods[0], &tree).expect("no signature");
        let b = signature_of(methods[1], &tree).expect("no signature");
        // Formatting differences inside parameter lists do not matter.
        assert_eq!(a, b);
        assert_eq!(a.parameters, vec!["int".to_string(), "string".to_string()]);
    }

    #[test]
    fn signature_distinguishes_overloads() {
        let tree = parse(
            "class C {\n  public void Load(int id) { }\n  public void Load(string name) { }\n}",
        );
        let class = first_of(&tree, "class_declaration");
        let methods = methods_of(class);
        let a = signature_of(methods[0], &tree).expect("no signature");
        let b = signature_of(methods[1], &tree).expect("no signature");
        assert_ne!(a, b);
    }

    #[test]
    fn void_return_type() {
        let tree = parse("class C { public void Save() { } }");
        let method = first_of(&tree, "method_declaration");
        let sig = signature_of(method, &tree).expect("no signature");
        assert_eq!(sig.return_type, "void");
    }
}
