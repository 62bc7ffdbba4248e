//! Tree-sitter based parsing and normalization for the reason index.
//!
//! Supports Python, JavaScript/TypeScript (plus JSX/TSX dialects), and
//! CSS/SCSS. Extracts function/class/method definitions, imports, call
//! sites, and style rules as a flat, parent-indexed node sequence.

pub mod extract;
pub mod idents;
pub mod languages;
pub mod span;
pub mod treesitter;
