//! Read/write the syntax index from disk.

use crate::index::SyntaxIndex;
use crate::schema;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const INDEX_DIR: &str = ".reason";
const INDEX_FILE: &str = "index.json";

/// zstd frame magic, used to detect compressed index files on load.
const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Get the path to the reason directory for a given project root.
pub fn index_dir(project_root: &Path) -> PathBuf {
    project_root.join(INDEX_DIR)
}

/// Get the path to the index file for a given project root.
pub fn index_file(project_root: &Path) -> PathBuf {
    index_dir(project_root).join(INDEX_FILE)
}

/// Check if an index exists for the given project root.
pub fn index_exists(project_root: &Path) -> bool {
    index_file(project_root).exists()
}

/// Load the index from disk. Compressed files are detected automatically.
pub fn load(project_root: &Path) -> Result<SyntaxIndex> {
    let path = index_file(project_root);
    let raw = fs::read(&path)
        .with_context(|| format!("failed to read index from {}", path.display()))?;
    let json = if raw.starts_with(&ZSTD_MAGIC) {
        let decoded = zstd::decode_all(raw.as_slice())
            .with_context(|| format!("failed to decompress index {}", path.display()))?;
        String::from_utf8(decoded).context("decompressed index is not valid UTF-8")?
    } else {
        String::from_utf8(raw).context("index file is not valid UTF-8")?
    };
    schema::from_json(&json)
}

/// Save the index to disk, creating the .reason directory if needed.
///
/// With `compress` set, the JSON document is zstd-compressed before
/// writing; decompression on load is automatic (detected by magic bytes).
pub fn save(project_root: &Path, index: &SyntaxIndex, compress: bool) -> Result<()> {
    let dir = index_dir(project_root);
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create index directory {}", dir.display()))?;

    let path = index_file(project_root);
    let json = schema::to_json(index)?;
    let bytes = if compress {
        zstd::encode_all(json.as_bytes(), 0).context("failed to compress index")?
    } else {
        json.into_bytes()
    };
    fs::write(&path, bytes)
        .with_context(|| format!("failed to write index to {}", path.display()))?;

    Ok(())
}

/// Ensure .reason is in .gitignore. Returns true if it was already there.
pub fn ensure_gitignore(project_root: &Path) -> Result<bool> {
    let gitignore = project_root.join(".gitignore");

    if gitignore.exists() {
        let content = fs::read_to_string(&gitignore)?;
        if content
            .lines()
            .any(|line| line.trim() == INDEX_DIR || line.trim() == ".reason/")
        {
            return Ok(true); // already ignored
        }
        // Append
        let mut new_content = content;
        if !new_content.ends_with('\n') {
            new_content.push('\n');
        }
        new_content.push_str("\n# reason syntax index\n.reason/\n");
        fs::write(&gitignore, new_content)?;
    } else {
        fs::write(&gitignore, "# reason syntax index\n.reason/\n")?;
    }

    Ok(false)
}
