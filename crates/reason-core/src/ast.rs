//! Normalized syntax node model shared by the extractors and the index.

use serde::{Deserialize, Serialize};

/// A row/column position in a source file (zero-based, column in bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

/// Byte and point extent of a syntax node in the raw source buffer.
///
/// Byte offsets count UTF-8 bytes (end exclusive), so slices taken with
/// them stay exact for multi-byte characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start_byte: usize,
    pub end_byte: usize,
    pub start: Point,
    pub end: Point,
}

/// Extractor-specific metadata attached to a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeMeta {
    /// Declared parameter names of a function definition.
    Params { names: Vec<String> },
    /// Names imported by a Python import statement.
    ImportNames { names: Vec<String> },
    /// Module path of an ECMAScript import statement.
    ImportSource { source: String },
}

/// A normalized syntax entity extracted from a concrete syntax tree.
///
/// Extractors emit these in pre-order: `parent`, when present, refers to an
/// earlier position in the same sequence, encoding the reduced hierarchy
/// over only the nodes of interest as a flat forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstNode {
    pub kind: String,
    pub name: Option<String>,
    pub span: Span,
    /// Position of the enclosing extracted node in the same sequence.
    pub parent: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<NodeMeta>,
}
