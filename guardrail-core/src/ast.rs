//! Small helpers over tree-sitter nodes.
//!
//! Shared by the definition collector and the call analyzer so node
//! traversal idioms stay in one place.

use tree_sitter::Node;

/// Find the first direct child node of the given kind.
#[inline]
pub fn child_by_kind<'a>(node: &Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|c| c.kind() == kind);
    found
}

/// Find all direct children of the given kind.
#[inline]
pub fn children_by_kind<'a>(node: &Node<'a>, kind: &str) -> Vec<Node<'a>> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|c| c.kind() == kind)
        .collect()
}

/// Collect all named children in document order.
#[inline]
pub fn named_children<'a>(node: &Node<'a>) -> Vec<Node<'a>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// Check whether any direct child (named or anonymous) has the given kind.
///
/// Keyword tokens such as `static` or `function` surface as anonymous
/// children whose kind equals their text.
#[inline]
pub fn has_child_kind(node: &Node<'_>, kind: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| c.kind() == kind);
    found
}

/// Extract the text content of a node.
#[inline]
pub fn node_text<'a>(node: &Node<'_>, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or_default()
}

/// 1-indexed source line of a node's start.
#[inline]
pub fn node_line(node: &Node<'_>) -> usize {
    node.start_position().row + 1
}

/// Name of a `variable_name` node without the `$` sigil.
#[inline]
pub fn variable_text<'a>(node: &Node<'_>, source: &'a str) -> &'a str {
    node_text(node, source).trim_start_matches('$')
}

/// Type annotation of a declaration node: the named field when the grammar
/// exposes one, otherwise the first direct child that is a type node.
pub fn type_child<'a>(node: &Node<'a>, field: &str) -> Option<Node<'a>> {
    node.child_by_field_name(field).or_else(|| {
        named_children(node).into_iter().find(|c| {
            matches!(
                c.kind(),
                "named_type"
                    | "optional_type"
                    | "union_type"
                    | "intersection_type"
                    | "primitive_type"
                    | "bottom_type"
            )
        })
    })
}
