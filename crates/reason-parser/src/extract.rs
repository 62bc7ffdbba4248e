//! Per-family extraction of normalized nodes from concrete syntax trees.
//!
//! One pre-order walk per tree: nodes of interest become [`AstNode`]s and
//! their descendants re-parent onto them; everything else is skipped but
//! still traversed, so definitions nested inside unhandled wrappers
//! (decorators, export statements, error nodes) are still discovered.

use crate::idents::{node_text, resolve_call_name};
use crate::languages::{Family, Language};
use crate::span::span_of;
use reason_core::ast::{AstNode, NodeMeta};
use tree_sitter::{Node, Tree};

/// What a family ruleset produced for a node of interest.
struct Extraction {
    kind: String,
    name: Option<String>,
    meta: Option<NodeMeta>,
}

/// Extract the normalized node sequence for one file.
///
/// Deterministic: the same tree and source always yield the same sequence.
pub fn extract(language: Language, tree: &Tree, source: &[u8]) -> Vec<AstNode> {
    match language.family() {
        Family::General => walk(tree, source, inspect_general),
        Family::Ecma => walk(tree, source, inspect_ecma),
        Family::Style => walk(tree, source, inspect_style),
    }
}

/// Pre-order traversal with an explicit work list.
///
/// Each entry carries the sequence index of the nearest extracted ancestor.
/// Unrecognized nodes propagate it unchanged to their children, which keeps
/// the parent chain intact across skipped syntax and bounds memory by tree
/// size rather than call depth. Children are pushed in reverse so they pop
/// in document order, making every emitted `parent` index strictly smaller
/// than the node's own position.
fn walk<'t>(
    tree: &'t Tree,
    source: &[u8],
    inspect: fn(&Node<'t>, &[u8]) -> Option<Extraction>,
) -> Vec<AstNode> {
    let mut out: Vec<AstNode> = Vec::new();
    let mut stack: Vec<(Node<'t>, Option<usize>)> = vec![(tree.root_node(), None)];

    while let Some((node, parent)) = stack.pop() {
        let parent_for_children = match inspect(&node, source) {
            Some(found) => {
                let idx = out.len();
                out.push(AstNode {
                    kind: found.kind,
                    name: found.name,
                    span: span_of(&node),
                    parent,
                    meta: found.meta,
                });
                Some(idx)
            }
            None => parent,
        };

        let mut cursor = node.walk();
        let children: Vec<Node<'t>> = node.children(&mut cursor).collect();
        for child in children.into_iter().rev() {
            stack.push((child, parent_for_children));
        }
    }

    out
}

// ---------------------------------------------------------------------------
// General-purpose family (Python-like grammars)
// ---------------------------------------------------------------------------

fn inspect_general(node: &Node, source: &[u8]) -> Option<Extraction> {
    match node.kind() {
        kind @ ("function_definition" | "class_definition") => {
            let name = node
                .child_by_field_name("name")
                .map(|n| node_text(&n, source));
            let meta = (kind == "function_definition")
                .then(|| parameter_names(node, source))
                .filter(|names| !names.is_empty())
                .map(|names| NodeMeta::Params { names });
            Some(Extraction {
                kind: kind.to_string(),
                name,
                meta,
            })
        }
        kind @ ("import_statement" | "import_from_statement") => {
            let names = import_names(node, source);
            Some(Extraction {
                kind: kind.to_string(),
                name: names.first().cloned(),
                meta: (!names.is_empty()).then_some(NodeMeta::ImportNames { names }),
            })
        }
        // The raw grammar tags call sites as plain `call`.
        "call" => Some(Extraction {
            kind: "call_expression".to_string(),
            name: resolve_call_name(node, source, &["function"]),
            meta: None,
        }),
        _ => None,
    }
}

/// Declared parameter names of a function definition.
///
/// Every parameter form contributes its bare name; annotations, default
/// values, and `*`/`**` markers are dropped.
fn parameter_names(node: &Node, source: &[u8]) -> Vec<String> {
    let Some(params) = node.child_by_field_name("parameters") else {
        return Vec::new();
    };
    let mut names = Vec::new();
    let mut cursor = params.walk();
    for child in params.children(&mut cursor) {
        match child.kind() {
            "identifier" => names.push(node_text(&child, source)),
            "typed_parameter" | "list_splat_pattern" | "dictionary_splat_pattern" => {
                if let Some(ident) = first_child_of_kind(&child, "identifier") {
                    names.push(node_text(&ident, source));
                }
            }
            "default_parameter" | "typed_default_parameter" => {
                if let Some(name) = child.child_by_field_name("name") {
                    names.push(node_text(&name, source));
                }
            }
            _ => {}
        }
    }
    names
}

/// Imported names in statement order: dotted or plain name children, plus
/// the original names of aliased imports.
fn import_names(node: &Node, source: &[u8]) -> Vec<String> {
    let mut names = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        match child.kind() {
            "dotted_name" | "identifier" => names.push(node_text(&child, source)),
            // `import x as y` keeps x, the importable name
            "aliased_import" => {
                if let Some(name) = child.child_by_field_name("name") {
                    names.push(node_text(&name, source));
                }
            }
            _ => {}
        }
    }
    names
}

fn first_child_of_kind<'t>(node: &Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).find(|c| c.kind() == kind)
}

// ---------------------------------------------------------------------------
// ECMAScript family (JavaScript, TypeScript, JSX dialects)
// ---------------------------------------------------------------------------

fn inspect_ecma(node: &Node, source: &[u8]) -> Option<Extraction> {
    match node.kind() {
        kind @ ("function_declaration"
        | "class_declaration"
        | "lexical_declaration"
        | "method_definition") => {
            // Anonymous and destructured forms carry no name field.
            let name = node
                .child_by_field_name("name")
                .map(|n| node_text(&n, source));
            Some(Extraction {
                kind: kind.to_string(),
                name,
                meta: None,
            })
        }
        "import_statement" => {
            let module = first_child_of_kind(node, "string")
                .map(|s| node_text(&s, source).trim_matches(['\'', '"']).to_string());
            Some(Extraction {
                kind: "import_statement".to_string(),
                name: module.clone(),
                meta: module.map(|source| NodeMeta::ImportSource { source }),
            })
        }
        "call_expression" => Some(Extraction {
            kind: "call_expression".to_string(),
            name: resolve_call_name(node, source, &["function", "callee"]),
            meta: None,
        }),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Style-sheet family (CSS, SCSS)
// ---------------------------------------------------------------------------

fn inspect_style(node: &Node, _source: &[u8]) -> Option<Extraction> {
    match node.kind() {
        "rule_set" => Some(Extraction {
            kind: "rule_set".to_string(),
            name: None,
            meta: None,
        }),
        // The grammar splits at-rules into per-keyword statement kinds;
        // all collapse into the canonical at_rule tag.
        "media_statement" | "supports_statement" | "keyframes_statement"
        | "import_statement" | "charset_statement" | "namespace_statement" | "at_rule" => {
            Some(Extraction {
                kind: "at_rule".to_string(),
                name: None,
                meta: None,
            })
        }
        _ => None,
    }
}
