//! Ingestion pipeline: read, fingerprint, parse, extract, persist.

use reason_core::ast::AstNode;
use reason_core::config::IngestConfig;
use reason_core::index::SyntaxIndex;
use reason_parser::extract::extract;
use reason_parser::languages::{Language, UnsupportedLanguage};
use reason_parser::treesitter::parse_source;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Errors that abort an ingestion run.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    UnsupportedLanguage(#[from] UnsupportedLanguage),
    #[error("cannot read {path}")]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

/// Result of one ingestion run.
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub run_id: u64,
    pub files_indexed: usize,
    /// Unreadable files skipped under `ingest.skip_unreadable`.
    pub skipped: Vec<PathBuf>,
}

/// SHA-256 fingerprint of raw file content, as lowercase hex.
fn content_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// Everything extracted from one file, staged before insertion.
struct FileArtifact {
    path: PathBuf,
    content_hash: String,
    size_bytes: u64,
    cst: String,
    nodes: Vec<AstNode>,
}

/// Ingest a batch of files as one run.
///
/// The index is only touched once every file has been read, parsed, and
/// extracted, so a failure mid-batch leaves no partial run behind. An
/// unknown language fails before any file is opened.
pub fn ingest_files(
    index: &mut SyntaxIndex,
    language: &str,
    files: &[PathBuf],
    root_path: Option<&Path>,
    config: &IngestConfig,
) -> Result<IngestOutcome, IngestError> {
    let lang = Language::from_name(language)?;

    // Phase 1: read and extract into local artifacts
    let mut artifacts = Vec::with_capacity(files.len());
    let mut skipped = Vec::new();
    for path in files {
        let data = match std::fs::read(path) {
            Ok(data) => data,
            Err(err) if config.skip_unreadable => {
                tracing::warn!("skipping unreadable file {}: {}", path.display(), err);
                skipped.push(path.clone());
                continue;
            }
            Err(err) => {
                return Err(IngestError::FileUnreadable {
                    path: path.clone(),
                    source: err,
                });
            }
        };

        let tree = parse_source(lang, &data).map_err(|err| IngestError::Parse {
            path: path.clone(),
            source: err,
        })?;
        let nodes = extract(lang, &tree, &data);
        tracing::debug!("extracted {} nodes from {}", nodes.len(), path.display());

        artifacts.push(FileArtifact {
            path: path.clone(),
            content_hash: content_hash(&data),
            size_bytes: data.len() as u64,
            cst: tree.root_node().to_sexp(),
            nodes,
        });
    }

    // Phase 2: persist the run
    let run_id = index.begin_run(lang.name(), root_path);
    let files_indexed = artifacts.len();
    for artifact in artifacts {
        let file_id = index.insert_file(
            run_id,
            &artifact.path,
            artifact.content_hash,
            artifact.size_bytes,
        );
        index.insert_cst(file_id, artifact.cst);
        index.insert_nodes(file_id, artifact.nodes);
    }

    tracing::info!(
        "run {} indexed {} file(s), {} skipped",
        run_id,
        files_indexed,
        skipped.len()
    );

    Ok(IngestOutcome {
        run_id,
        files_indexed,
        skipped,
    })
}
