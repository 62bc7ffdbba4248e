//! Byte-range source slice retrieval.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// A decoded slice of a source file.
#[derive(Debug, Clone, Serialize)]
pub struct SourceSlice {
    pub path: PathBuf,
    pub start_byte: usize,
    pub end_byte: usize,
    pub text: String,
}

/// Read the byte range `[start_byte, end_byte)` of a file and decode it as
/// text with invalid sequences replaced. Ranges past the end of the file
/// yield whatever bytes exist.
pub fn read_slice(path: &Path, start_byte: usize, end_byte: usize) -> Result<SourceSlice> {
    let mut file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    file.seek(SeekFrom::Start(start_byte as u64))
        .with_context(|| format!("failed to seek in {}", path.display()))?;

    let len = end_byte.saturating_sub(start_byte);
    let mut data = Vec::with_capacity(len);
    file.take(len as u64)
        .read_to_end(&mut data)
        .with_context(|| format!("failed to read {}", path.display()))?;

    Ok(SourceSlice {
        path: path.to_path_buf(),
        start_byte,
        end_byte,
        text: String::from_utf8_lossy(&data).into_owned(),
    })
}
