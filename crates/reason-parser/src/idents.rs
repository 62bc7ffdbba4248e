//! Call-target identifier resolution.

use tree_sitter::Node;

/// Grammar token kinds that act as identifiers when naming a call target.
///
/// Member access stores the final segment under a grammar-specific token
/// kind (`property_identifier` in the ECMAScript grammars), so plain
/// `identifier` alone would name `a` rather than `c` for `a.b.c()`.
fn is_identifier_kind(kind: &str) -> bool {
    kind == "identifier" || kind.ends_with("_identifier")
}

/// Decoded text of a node, with invalid sequences replaced.
pub(crate) fn node_text(node: &Node, source: &[u8]) -> String {
    String::from_utf8_lossy(&source[node.byte_range()]).into_owned()
}

/// Find the best identifying token for a call-like node.
///
/// Candidate field names are tried in order; the first present child is the
/// target. A node exposing none of the expected fields cannot be named at
/// all. A bare identifier target names the call directly; anything else
/// (member/dotted access) is searched depth-first for its last identifier
/// token, so `a.b.c()` resolves to the rightmost segment `c`.
pub fn resolve_call_name(
    node: &Node,
    source: &[u8],
    candidate_fields: &[&str],
) -> Option<String> {
    let target = candidate_fields
        .iter()
        .find_map(|field| node.child_by_field_name(field))?;
    if is_identifier_kind(target.kind()) {
        return Some(node_text(&target, source));
    }
    last_identifier(&target).map(|n| node_text(&n, source))
}

/// Depth-first search for the last identifier token in a subtree,
/// preferring later matches over earlier ones at every level.
fn last_identifier<'t>(node: &Node<'t>) -> Option<Node<'t>> {
    let mut last = None;
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if is_identifier_kind(child.kind()) {
            last = Some(child);
        }
        if let Some(deeper) = last_identifier(&child) {
            last = Some(deeper);
        }
    }
    last
}
