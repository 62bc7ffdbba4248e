//! reason MCP server
//! Exposes ingest and query tools over stdio so any connected LLM can index
//! and navigate source files by syntax.

use anyhow::Result;
use rmcp::ServiceExt;
use std::path::PathBuf;

mod server;

#[tokio::main]
async fn main() -> Result<()> {
    let project_root = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::current_dir().expect("failed to get current directory"));

    eprintln!("reason MCP server starting for: {}", project_root.display());

    let server = server::ReasonServer::new(project_root);
    let service = server
        .serve(rmcp::transport::io::stdio())
        .await
        .inspect_err(|e| eprintln!("serve error: {}", e))
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    service.waiting().await?;

    Ok(())
}
