//! Tree-sitter integration for parsing raw source bytes.

use crate::languages::Language;
use anyhow::{Context, Result};

/// Parse source bytes and return the tree-sitter tree.
pub fn parse_source(language: Language, source: &[u8]) -> Result<tree_sitter::Tree> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&language.ts_language())
        .context("failed to set tree-sitter language")?;
    parser
        .parse(source, None)
        .ok_or_else(|| anyhow::anyhow!("failed to parse {} source", language.name()))
}
