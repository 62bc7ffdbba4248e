//! Span extraction from concrete syntax nodes.

use reason_core::ast::{Point, Span};

/// Read a node's byte offsets and row/column points into a span record.
pub fn span_of(node: &tree_sitter::Node) -> Span {
    let start = node.start_position();
    let end = node.end_position();
    Span {
        start_byte: node.start_byte(),
        end_byte: node.end_byte(),
        start: Point {
            row: start.row,
            column: start.column,
        },
        end: Point {
            row: end.row,
            column: end.column,
        },
    }
}
