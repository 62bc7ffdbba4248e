//! `ReasonServer` state, tool parameter types, and MCP tool implementations.

use reason_core::config::ReasonConfig;
use reason_core::index::{NodeFilter, SyntaxIndex};
use reason_core::storage;
use reason_ingest::ingest::ingest_files;
use reason_ingest::slice::read_slice;
use rmcp::{
    ServerHandler, handler::server::wrapper::Parameters, model::ServerInfo, tool, tool_handler,
    tool_router,
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// The reason MCP server state.
#[derive(Clone)]
pub struct ReasonServer {
    project_root: PathBuf,
    index: Arc<RwLock<Option<SyntaxIndex>>>,
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
}

impl std::fmt::Debug for ReasonServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReasonServer")
            .field("project_root", &self.project_root)
            .finish()
    }
}

impl ReasonServer {
    /// Create a new server, loading an existing index from `project_root`
    /// if present.
    pub fn new(project_root: PathBuf) -> Self {
        let index = storage::load(&project_root).ok();
        Self {
            project_root,
            index: Arc::new(RwLock::new(index)),
            tool_router: Self::tool_router(),
        }
    }

    fn config(&self) -> ReasonConfig {
        ReasonConfig::load(&self.project_root).unwrap_or_default()
    }

    /// Ensure an index is loaded in memory, attempting disk load if needed.
    async fn ensure_index(&self) -> Result<(), String> {
        let read = self.index.read().await;
        if read.is_some() {
            return Ok(());
        }
        drop(read);

        match storage::load(&self.project_root) {
            Ok(idx) => {
                *self.index.write().await = Some(idx);
                Ok(())
            }
            Err(_) => Err("No index found. Use the ingest tool to index files first.".into()),
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct IngestParams {
    /// Programming language (python, javascript, js, ts, tsx, css, scss)
    language: String,
    /// Absolute paths of the files to ingest
    files: Vec<String>,
    /// Optional project root path recorded on the run
    root_path: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct QueryNodesParams {
    /// Node kind filter (e.g. function_definition, class_declaration, call_expression, import_statement)
    kind: Option<String>,
    /// Exact name filter
    name: Option<String>,
    /// Maximum results (default from config)
    limit: Option<usize>,
    /// Filter to a specific ingestion run
    run_id: Option<u64>,
    /// Filter to a specific file
    file_id: Option<u64>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct NamedQueryParams {
    /// Exact name filter (e.g. 'MyClass', 'process_data')
    name: Option<String>,
    /// Maximum results (default from config)
    limit: Option<usize>,
    /// Filter to a specific ingestion run
    run_id: Option<u64>,
    /// Filter to a specific file
    file_id: Option<u64>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ListRunsParams {
    /// Maximum number of runs to return
    limit: Option<usize>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ListRunFilesParams {
    /// The ingestion run to list files for
    run_id: u64,
    /// Maximum number of files to return
    limit: Option<usize>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct GetFileParams {
    /// The id of the source file
    file_id: u64,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct GetNodeParams {
    /// The id of the indexed node
    node_id: u64,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct GetSourceParams {
    /// Absolute path to the source file
    path: String,
    /// Start byte offset (inclusive)
    start_byte: usize,
    /// End byte offset (exclusive)
    end_byte: usize,
}

#[tool_router]
impl ReasonServer {
    #[tool(
        description = "Ingest source files into the index for a given language. Creates a new run, parses each file, extracts definitions/imports/calls, and returns the run id and file count."
    )]
    async fn ingest(&self, Parameters(params): Parameters<IngestParams>) -> Result<String, String> {
        let config = self.config();
        let files: Vec<PathBuf> = params.files.iter().map(PathBuf::from).collect();
        let root = params.root_path.as_ref().map(PathBuf::from);

        let mut guard = self.index.write().await;
        let index = guard.get_or_insert_with(SyntaxIndex::new);
        let outcome = ingest_files(
            index,
            &params.language,
            &files,
            root.as_deref(),
            &config.ingest,
        )
        .map_err(|e| e.to_string())?;
        storage::save(&self.project_root, index, config.storage.compress)
            .map_err(|e| format!("failed to save index: {}", e))?;

        serde_json::to_string(&serde_json::json!({
            "run_id": outcome.run_id,
            "files_indexed": outcome.files_indexed,
            "skipped": outcome.skipped,
        }))
        .map_err(|e| e.to_string())
    }

    #[tool(description = "List ingestion runs, most recent first.")]
    async fn list_runs(
        &self,
        Parameters(params): Parameters<ListRunsParams>,
    ) -> Result<String, String> {
        self.ensure_index().await?;
        let guard = self.index.read().await;
        let index = guard.as_ref().unwrap();
        let limit = params.limit.unwrap_or(self.config().query.result_limit);
        serde_json::to_string(&index.list_runs(limit)).map_err(|e| e.to_string())
    }

    #[tool(description = "List files that belong to a specific ingestion run.")]
    async fn list_run_files(
        &self,
        Parameters(params): Parameters<ListRunFilesParams>,
    ) -> Result<String, String> {
        self.ensure_index().await?;
        let guard = self.index.read().await;
        let index = guard.as_ref().unwrap();
        if index.run(params.run_id).is_none() {
            return Err(format!("run not found: {}", params.run_id));
        }
        let limit = params.limit.unwrap_or(self.config().query.file_list_limit);
        serde_json::to_string(&index.list_run_files(params.run_id, limit))
            .map_err(|e| e.to_string())
    }

    #[tool(
        description = "Search indexed nodes by kind and/or exact name. Returns compact summaries with ids, kinds, names, and line/column positions."
    )]
    async fn query_nodes(
        &self,
        Parameters(params): Parameters<QueryNodesParams>,
    ) -> Result<String, String> {
        self.ensure_index().await?;
        let guard = self.index.read().await;
        let index = guard.as_ref().unwrap();
        let filter = NodeFilter {
            kind: params.kind.as_deref(),
            name: params.name.as_deref(),
            run_id: params.run_id,
            file_id: params.file_id,
            limit: params.limit.unwrap_or(self.config().query.result_limit),
        };
        let results: Vec<_> = index
            .query_nodes(&filter)
            .into_iter()
            .map(|n| n.summary())
            .collect();
        serde_json::to_string(&results).map_err(|e| e.to_string())
    }

    #[tool(description = "Search for function/class definitions by exact name.")]
    async fn query_defs(
        &self,
        Parameters(params): Parameters<NamedQueryParams>,
    ) -> Result<String, String> {
        self.ensure_index().await?;
        let guard = self.index.read().await;
        let index = guard.as_ref().unwrap();
        let filter = NodeFilter {
            kind: None,
            name: params.name.as_deref(),
            run_id: params.run_id,
            file_id: params.file_id,
            limit: params.limit.unwrap_or(self.config().query.result_limit),
        };
        let results: Vec<_> = index
            .query_defs(&filter)
            .into_iter()
            .map(|n| n.summary())
            .collect();
        serde_json::to_string(&results).map_err(|e| e.to_string())
    }

    #[tool(description = "Search for function/method call sites by callee name.")]
    async fn query_calls(
        &self,
        Parameters(params): Parameters<NamedQueryParams>,
    ) -> Result<String, String> {
        self.ensure_index().await?;
        let guard = self.index.read().await;
        let index = guard.as_ref().unwrap();
        let filter = NodeFilter {
            kind: None,
            name: params.name.as_deref(),
            run_id: params.run_id,
            file_id: params.file_id,
            limit: params.limit.unwrap_or(self.config().query.result_limit),
        };
        let results: Vec<_> = index
            .query_calls(&filter)
            .into_iter()
            .map(|n| n.summary())
            .collect();
        serde_json::to_string(&results).map_err(|e| e.to_string())
    }

    #[tool(description = "Get metadata for a source file by its id.")]
    async fn get_file(
        &self,
        Parameters(params): Parameters<GetFileParams>,
    ) -> Result<String, String> {
        self.ensure_index().await?;
        let guard = self.index.read().await;
        let index = guard.as_ref().unwrap();
        match index.file(params.file_id) {
            Some(file) => serde_json::to_string(file).map_err(|e| e.to_string()),
            None => Err(format!("file not found: {}", params.file_id)),
        }
    }

    #[tool(
        description = "Get detailed information about an indexed node by its id, including parent id, byte offsets, and metadata."
    )]
    async fn get_node(
        &self,
        Parameters(params): Parameters<GetNodeParams>,
    ) -> Result<String, String> {
        self.ensure_index().await?;
        let guard = self.index.read().await;
        let index = guard.as_ref().unwrap();
        match index.node(params.node_id) {
            Some(node) => serde_json::to_string(&node.detail()).map_err(|e| e.to_string()),
            None => Err(format!("node not found: {}", params.node_id)),
        }
    }

    #[tool(
        description = "Fetch a source code slice by file path and byte range. Byte offsets come from node details; invalid UTF-8 is replaced."
    )]
    async fn get_source(
        &self,
        Parameters(params): Parameters<GetSourceParams>,
    ) -> Result<String, String> {
        let slice = read_slice(Path::new(&params.path), params.start_byte, params.end_byte)
            .map_err(|e| e.to_string())?;
        serde_json::to_string(&slice).map_err(|e| e.to_string())
    }

    #[tool(description = "Get index statistics: run, file, and node counts plus indexed languages.")]
    async fn index_info(&self) -> Result<String, String> {
        self.ensure_index().await?;
        let guard = self.index.read().await;
        let index = guard.as_ref().unwrap();
        serde_json::to_string(&serde_json::json!({
            "version": index.version,
            "stats": index.stats(),
        }))
        .map_err(|e| e.to_string())
    }

    #[tool(
        description = "Reload the index from disk. Use after external changes to .reason/index.json."
    )]
    async fn reload_index(&self) -> Result<String, String> {
        match storage::load(&self.project_root) {
            Ok(idx) => {
                let stats = idx.stats();
                *self.index.write().await = Some(idx);
                Ok(format!(
                    "Index reloaded. {} nodes across {} files.",
                    stats.nodes, stats.files
                ))
            }
            Err(e) => Err(format!("failed to reload index: {}", e)),
        }
    }
}

#[tool_handler]
impl ServerHandler for ReasonServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "reason: multi-language syntax index over tree-sitter grammars.\n\n\
                 QUICKSTART:\n\
                 1. Call ingest with a language and file paths to index them\n\
                 2. Search with query_nodes / query_defs / query_calls\n\
                 3. Fetch exact source with get_source using a node's byte offsets\n\n\
                 Tools:\n\
                 - ingest: Index files as a new run\n\
                 - list_runs / list_run_files: Browse ingestion history\n\
                 - query_nodes: Search nodes by kind and/or name\n\
                 - query_defs: Search function/class definitions\n\
                 - query_calls: Search call sites by callee name\n\
                 - get_file / get_node: Look up files and nodes by id\n\
                 - get_source: Read a byte-range source slice\n\
                 - index_info: Index statistics\n\
                 - reload_index: Reload the index from disk"
                    .into(),
            ),
            ..Default::default()
        }
    }
}
