//! JSON schema validation and version handling for index files.

use crate::index::SyntaxIndex;
use anyhow::{Context, Result};

pub const CURRENT_VERSION: &str = "1.2.0";

/// Validate a SyntaxIndex's schema version.
pub fn validate_version(index: &SyntaxIndex) -> Result<()> {
    if index.version != CURRENT_VERSION {
        anyhow::bail!(
            "index version mismatch: expected {}, found {}",
            CURRENT_VERSION,
            index.version
        );
    }
    Ok(())
}

/// Serialize a SyntaxIndex to a pretty-printed JSON string.
pub fn to_json(index: &SyntaxIndex) -> Result<String> {
    serde_json::to_string_pretty(index).context("failed to serialize index to JSON")
}

/// Deserialize a SyntaxIndex from a JSON string.
pub fn from_json(json: &str) -> Result<SyntaxIndex> {
    let index: SyntaxIndex =
        serde_json::from_str(json).context("failed to deserialize index from JSON")?;
    validate_version(&index)?;
    Ok(index)
}
