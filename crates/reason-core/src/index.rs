//! The persisted syntax index: runs, source files, CST blobs, and nodes.

use crate::ast::{AstNode, NodeMeta, Span};
use crate::schema;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One logical ingestion batch of files under a single language.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    pub id: u64,
    pub language: String,
    pub root_path: Option<PathBuf>,
    pub created_at: DateTime<Utc>,
}

/// Metadata for one ingested source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    pub id: u64,
    pub run_id: u64,
    pub path: PathBuf,
    pub content_hash: String,
    pub size_bytes: u64,
}

/// The serialized concrete syntax tree of a file (root s-expression).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CstBlob {
    pub file_id: u64,
    pub tree: String,
}

/// An extracted node with storage identity assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedNode {
    pub id: u64,
    pub file_id: u64,
    pub kind: String,
    pub name: Option<String>,
    /// Id of the enclosing extracted node within the same file.
    pub parent_id: Option<u64>,
    pub span: Span,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<NodeMeta>,
}

/// Node kinds that count as definitions across extractor families.
pub const DEF_KINDS: &[&str] = &[
    "function_definition",
    "class_definition",
    "function_declaration",
    "class_declaration",
    "method_definition",
];

/// Canonical kind tag for call sites in every family.
pub const CALL_KIND: &str = "call_expression";

/// The complete persisted index document.
///
/// Collections are keyed by their assigned ids; ids are allocated in
/// ascending order, so iteration preserves insertion (and per-file
/// pre-order) order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntaxIndex {
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub runs: BTreeMap<u64, Run>,
    pub files: BTreeMap<u64, SourceFile>,
    /// Keyed by file id.
    pub csts: BTreeMap<u64, CstBlob>,
    pub nodes: BTreeMap<u64, IndexedNode>,
    next_run_id: u64,
    next_file_id: u64,
    next_node_id: u64,
}

impl Default for SyntaxIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl SyntaxIndex {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            version: schema::CURRENT_VERSION.to_string(),
            created_at: now,
            updated_at: now,
            runs: BTreeMap::new(),
            files: BTreeMap::new(),
            csts: BTreeMap::new(),
            nodes: BTreeMap::new(),
            next_run_id: 1,
            next_file_id: 1,
            next_node_id: 1,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Start a new ingestion run and return its id.
    pub fn begin_run(&mut self, language: &str, root_path: Option<&Path>) -> u64 {
        let id = self.next_run_id;
        self.next_run_id += 1;
        self.runs.insert(
            id,
            Run {
                id,
                language: language.to_string(),
                root_path: root_path.map(Path::to_path_buf),
                created_at: Utc::now(),
            },
        );
        self.touch();
        id
    }

    /// Register a source file under a run and return its id.
    pub fn insert_file(
        &mut self,
        run_id: u64,
        path: &Path,
        content_hash: String,
        size_bytes: u64,
    ) -> u64 {
        let id = self.next_file_id;
        self.next_file_id += 1;
        self.files.insert(
            id,
            SourceFile {
                id,
                run_id,
                path: path.to_path_buf(),
                content_hash,
                size_bytes,
            },
        );
        self.touch();
        id
    }

    /// Attach the serialized concrete tree of a file.
    pub fn insert_cst(&mut self, file_id: u64, tree: String) {
        self.csts.insert(file_id, CstBlob { file_id, tree });
        self.touch();
    }

    /// Insert a file's extracted sequence, translating pre-order sequence
    /// positions into assigned node ids. Returns the ids in sequence order.
    pub fn insert_nodes(&mut self, file_id: u64, nodes: Vec<AstNode>) -> Vec<u64> {
        let mut ids = Vec::with_capacity(nodes.len());
        for node in nodes {
            let id = self.next_node_id;
            self.next_node_id += 1;
            // A parent always precedes its children in the sequence, so the
            // id it was assigned is already known here.
            let parent_id = node.parent.and_then(|idx| ids.get(idx).copied());
            self.nodes.insert(
                id,
                IndexedNode {
                    id,
                    file_id,
                    kind: node.kind,
                    name: node.name,
                    parent_id,
                    span: node.span,
                    meta: node.meta,
                },
            );
            ids.push(id);
        }
        self.touch();
        ids
    }

    fn in_run(&self, node: &IndexedNode, run_id: u64) -> bool {
        self.files
            .get(&node.file_id)
            .is_some_and(|f| f.run_id == run_id)
    }

    /// Search nodes by kind and/or exact name, optionally scoped to a run
    /// or file. Results come back in id (insertion) order.
    pub fn query_nodes(&self, filter: &NodeFilter) -> Vec<&IndexedNode> {
        let mut out = Vec::new();
        for node in self.nodes.values() {
            if let Some(kind) = filter.kind
                && node.kind != kind
            {
                continue;
            }
            if let Some(name) = filter.name
                && node.name.as_deref() != Some(name)
            {
                continue;
            }
            if let Some(file_id) = filter.file_id
                && node.file_id != file_id
            {
                continue;
            }
            if let Some(run_id) = filter.run_id
                && !self.in_run(node, run_id)
            {
                continue;
            }
            out.push(node);
            if out.len() >= filter.limit {
                break;
            }
        }
        out
    }

    /// Search function/class definitions across all extractor families.
    pub fn query_defs(&self, filter: &NodeFilter) -> Vec<&IndexedNode> {
        let mut out = Vec::new();
        for node in self.nodes.values() {
            if !DEF_KINDS.contains(&node.kind.as_str()) {
                continue;
            }
            if let Some(name) = filter.name
                && node.name.as_deref() != Some(name)
            {
                continue;
            }
            if let Some(file_id) = filter.file_id
                && node.file_id != file_id
            {
                continue;
            }
            if let Some(run_id) = filter.run_id
                && !self.in_run(node, run_id)
            {
                continue;
            }
            out.push(node);
            if out.len() >= filter.limit {
                break;
            }
        }
        out
    }

    /// Search call sites by callee name.
    pub fn query_calls(&self, filter: &NodeFilter) -> Vec<&IndexedNode> {
        let scoped = NodeFilter {
            kind: Some(CALL_KIND),
            ..*filter
        };
        self.query_nodes(&scoped)
    }

    /// List ingestion runs, most recent first.
    pub fn list_runs(&self, limit: usize) -> Vec<&Run> {
        self.runs.values().rev().take(limit).collect()
    }

    /// List files that belong to a specific run.
    pub fn list_run_files(&self, run_id: u64, limit: usize) -> Vec<&SourceFile> {
        self.files
            .values()
            .filter(|f| f.run_id == run_id)
            .take(limit)
            .collect()
    }

    pub fn run(&self, id: u64) -> Option<&Run> {
        self.runs.get(&id)
    }

    pub fn file(&self, id: u64) -> Option<&SourceFile> {
        self.files.get(&id)
    }

    pub fn node(&self, id: u64) -> Option<&IndexedNode> {
        self.nodes.get(&id)
    }

    pub fn cst(&self, file_id: u64) -> Option<&str> {
        self.csts.get(&file_id).map(|c| c.tree.as_str())
    }

    /// Aggregate counts for the info surfaces.
    pub fn stats(&self) -> IndexStats {
        let mut languages: Vec<String> =
            self.runs.values().map(|r| r.language.clone()).collect();
        languages.sort();
        languages.dedup();
        IndexStats {
            runs: self.runs.len(),
            files: self.files.len(),
            nodes: self.nodes.len(),
            languages,
        }
    }
}

/// Filters for node queries; `None` fields match everything.
#[derive(Debug, Clone, Copy)]
pub struct NodeFilter<'a> {
    pub kind: Option<&'a str>,
    pub name: Option<&'a str>,
    pub run_id: Option<u64>,
    pub file_id: Option<u64>,
    pub limit: usize,
}

impl Default for NodeFilter<'_> {
    fn default() -> Self {
        Self {
            kind: None,
            name: None,
            run_id: None,
            file_id: None,
            limit: 50,
        }
    }
}

/// Aggregate index statistics.
#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    pub runs: usize,
    pub files: usize,
    pub nodes: usize,
    pub languages: Vec<String>,
}

/// Compact node representation for query result lists.
#[derive(Debug, Clone, Serialize)]
pub struct NodeSummary {
    pub id: u64,
    pub file_id: u64,
    pub kind: String,
    pub name: Option<String>,
    pub start: [usize; 2],
    pub end: [usize; 2],
}

/// Full node representation including byte offsets and metadata.
#[derive(Debug, Clone, Serialize)]
pub struct NodeDetail {
    pub id: u64,
    pub file_id: u64,
    pub kind: String,
    pub name: Option<String>,
    pub parent_id: Option<u64>,
    pub start: [usize; 2],
    pub end: [usize; 2],
    pub start_byte: usize,
    pub end_byte: usize,
    pub meta: Option<NodeMeta>,
}

impl IndexedNode {
    pub fn summary(&self) -> NodeSummary {
        NodeSummary {
            id: self.id,
            file_id: self.file_id,
            kind: self.kind.clone(),
            name: self.name.clone(),
            start: [self.span.start.row, self.span.start.column],
            end: [self.span.end.row, self.span.end.column],
        }
    }

    pub fn detail(&self) -> NodeDetail {
        NodeDetail {
            id: self.id,
            file_id: self.file_id,
            kind: self.kind.clone(),
            name: self.name.clone(),
            parent_id: self.parent_id,
            start: [self.span.start.row, self.span.start.column],
            end: [self.span.end.row, self.span.end.column],
            start_byte: self.span.start_byte,
            end_byte: self.span.end_byte,
            meta: self.meta.clone(),
        }
    }
}
