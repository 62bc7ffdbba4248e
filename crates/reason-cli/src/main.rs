//! CLI binary for reason: ingest source files and query the syntax index.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reason_core::config::ReasonConfig;
use reason_core::index::{NodeFilter, SyntaxIndex};
use reason_core::storage;
use reason_ingest::ingest::ingest_files;
use reason_ingest::slice::read_slice;
use reason_parser::languages::Language;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "reason", about = "Multi-language syntax indexer")]
struct Cli {
    /// Project root directory (defaults to current directory)
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest source files into the index as a new run
    Ingest {
        /// Language of the files (python, js, ts, tsx, css, scss)
        #[arg(short, long)]
        lang: String,

        /// Files to ingest; omit and pass --scan to discover by extension
        files: Vec<PathBuf>,

        /// Discover files under the project root instead of listing them
        #[arg(long)]
        scan: bool,

        /// Glob patterns to include files (repeatable, with --scan)
        #[arg(long)]
        include: Vec<String>,

        /// Glob patterns to exclude files (repeatable, with --scan)
        #[arg(long)]
        exclude: Vec<String>,
    },

    /// Search indexed nodes by kind and/or exact name
    Query {
        /// Node kind (e.g. function_definition, call_expression)
        #[arg(short, long)]
        kind: Option<String>,

        /// Exact name filter
        #[arg(short, long)]
        name: Option<String>,

        /// Restrict to an ingestion run
        #[arg(long)]
        run: Option<u64>,

        /// Restrict to a file
        #[arg(long)]
        file: Option<u64>,

        /// Maximum results (default from config)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Search function/class definitions
    Defs {
        #[arg(short, long)]
        name: Option<String>,
        #[arg(long)]
        run: Option<u64>,
        #[arg(long)]
        file: Option<u64>,
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Search call sites by callee name
    Calls {
        #[arg(short, long)]
        name: Option<String>,
        #[arg(long)]
        run: Option<u64>,
        #[arg(long)]
        file: Option<u64>,
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List ingestion runs, most recent first
    Runs {
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List files that belong to a run
    Files {
        run_id: u64,
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show metadata for a source file
    File { file_id: u64 },

    /// Show details for an indexed node
    Node { node_id: u64 },

    /// Print a byte-range slice of a source file
    Slice {
        path: PathBuf,
        start_byte: usize,
        end_byte: usize,
    },

    /// Show index statistics
    Info,
}

fn get_project_root(cli: &Cli) -> Result<PathBuf> {
    match &cli.project {
        Some(p) => Ok(p.clone()),
        None => std::env::current_dir().context("failed to get current directory"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let project_root = get_project_root(&cli)?;

    match cli.command {
        Commands::Ingest {
            lang,
            files,
            scan,
            include,
            exclude,
        } => cmd_ingest(&project_root, &lang, files, scan, &include, &exclude),
        Commands::Query {
            kind,
            name,
            run,
            file,
            limit,
        } => cmd_query(&project_root, kind, name, run, file, limit),
        Commands::Defs {
            name,
            run,
            file,
            limit,
        } => cmd_defs(&project_root, name, run, file, limit),
        Commands::Calls {
            name,
            run,
            file,
            limit,
        } => cmd_calls(&project_root, name, run, file, limit),
        Commands::Runs { limit } => cmd_runs(&project_root, limit),
        Commands::Files { run_id, limit } => cmd_files(&project_root, run_id, limit),
        Commands::File { file_id } => cmd_file(&project_root, file_id),
        Commands::Node { node_id } => cmd_node(&project_root, node_id),
        Commands::Slice {
            path,
            start_byte,
            end_byte,
        } => cmd_slice(&path, start_byte, end_byte),
        Commands::Info => cmd_info(&project_root),
    }
}

/// Collect source files for a language under the project root, honoring
/// gitignore rules, `.reasonignore`, and the include/exclude globs.
fn collect_source_files(
    project_root: &Path,
    language: Language,
    include: &[String],
    exclude: &[String],
) -> Vec<PathBuf> {
    use indicatif::{ProgressBar, ProgressStyle};

    let include_set = if include.is_empty() {
        None
    } else {
        let mut builder = globset::GlobSetBuilder::new();
        for p in include {
            builder.add(globset::Glob::new(p).expect("invalid --include glob"));
        }
        Some(builder.build().expect("invalid --include glob set"))
    };
    let exclude_set = if exclude.is_empty() {
        None
    } else {
        let mut builder = globset::GlobSetBuilder::new();
        for p in exclude {
            builder.add(globset::Glob::new(p).expect("invalid --exclude glob"));
        }
        Some(builder.build().expect("invalid --exclude glob set"))
    };

    let walker = ignore::WalkBuilder::new(project_root)
        .hidden(true)
        .git_ignore(true)
        .add_custom_ignore_filename(".reasonignore")
        .build();

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    spinner.set_message("Scanning files...");

    let mut files = Vec::new();
    for entry in walker.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if Language::from_extension(ext) != Some(language) {
            continue;
        }
        let rel_path = path.strip_prefix(project_root).unwrap_or(path);
        if let Some(ref inc) = include_set
            && !inc.is_match(rel_path)
        {
            continue;
        }
        if let Some(ref exc) = exclude_set
            && exc.is_match(rel_path)
        {
            continue;
        }
        files.push(path.to_path_buf());
        spinner.set_message(format!("{} files collected", files.len()));
        spinner.tick();
    }
    spinner.finish_and_clear();
    files
}

fn load_or_new(project_root: &Path) -> Result<SyntaxIndex> {
    if storage::index_exists(project_root) {
        storage::load(project_root)
    } else {
        Ok(SyntaxIndex::new())
    }
}

fn load_index(project_root: &Path) -> Result<SyntaxIndex> {
    storage::load(project_root).with_context(|| {
        format!(
            "no index found under {}; run `reason ingest` first",
            project_root.display()
        )
    })
}

fn cmd_ingest(
    project_root: &Path,
    lang: &str,
    files: Vec<PathBuf>,
    scan: bool,
    include: &[String],
    exclude: &[String],
) -> Result<()> {
    let config = ReasonConfig::load(project_root)?;
    let language = Language::from_name(lang)?;

    let files = if scan {
        collect_source_files(project_root, language, include, exclude)
    } else {
        files
    };
    anyhow::ensure!(!files.is_empty(), "no files to ingest");

    let mut index = load_or_new(project_root)?;
    let outcome = ingest_files(&mut index, lang, &files, Some(project_root), &config.ingest)?;
    storage::save(project_root, &index, config.storage.compress)?;
    let _ = storage::ensure_gitignore(project_root);

    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "run_id": outcome.run_id,
            "files_indexed": outcome.files_indexed,
            "skipped": outcome.skipped,
        }))?
    );
    Ok(())
}

fn cmd_query(
    project_root: &Path,
    kind: Option<String>,
    name: Option<String>,
    run: Option<u64>,
    file: Option<u64>,
    limit: Option<usize>,
) -> Result<()> {
    let config = ReasonConfig::load(project_root)?;
    let index = load_index(project_root)?;
    let filter = NodeFilter {
        kind: kind.as_deref(),
        name: name.as_deref(),
        run_id: run,
        file_id: file,
        limit: limit.unwrap_or(config.query.result_limit),
    };
    let results: Vec<_> = index
        .query_nodes(&filter)
        .into_iter()
        .map(|n| n.summary())
        .collect();
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

fn cmd_defs(
    project_root: &Path,
    name: Option<String>,
    run: Option<u64>,
    file: Option<u64>,
    limit: Option<usize>,
) -> Result<()> {
    let config = ReasonConfig::load(project_root)?;
    let index = load_index(project_root)?;
    let filter = NodeFilter {
        kind: None,
        name: name.as_deref(),
        run_id: run,
        file_id: file,
        limit: limit.unwrap_or(config.query.result_limit),
    };
    let results: Vec<_> = index
        .query_defs(&filter)
        .into_iter()
        .map(|n| n.summary())
        .collect();
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

fn cmd_calls(
    project_root: &Path,
    name: Option<String>,
    run: Option<u64>,
    file: Option<u64>,
    limit: Option<usize>,
) -> Result<()> {
    let config = ReasonConfig::load(project_root)?;
    let index = load_index(project_root)?;
    let filter = NodeFilter {
        kind: None,
        name: name.as_deref(),
        run_id: run,
        file_id: file,
        limit: limit.unwrap_or(config.query.result_limit),
    };
    let results: Vec<_> = index
        .query_calls(&filter)
        .into_iter()
        .map(|n| n.summary())
        .collect();
    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}

fn cmd_runs(project_root: &Path, limit: Option<usize>) -> Result<()> {
    let config = ReasonConfig::load(project_root)?;
    let index = load_index(project_root)?;
    let runs = index.list_runs(limit.unwrap_or(config.query.result_limit));
    println!("{}", serde_json::to_string_pretty(&runs)?);
    Ok(())
}

fn cmd_files(project_root: &Path, run_id: u64, limit: Option<usize>) -> Result<()> {
    let config = ReasonConfig::load(project_root)?;
    let index = load_index(project_root)?;
    anyhow::ensure!(index.run(run_id).is_some(), "run not found: {}", run_id);
    let files = index.list_run_files(run_id, limit.unwrap_or(config.query.file_list_limit));
    println!("{}", serde_json::to_string_pretty(&files)?);
    Ok(())
}

fn cmd_file(project_root: &Path, file_id: u64) -> Result<()> {
    let index = load_index(project_root)?;
    let file = index
        .file(file_id)
        .with_context(|| format!("file not found: {}", file_id))?;
    println!("{}", serde_json::to_string_pretty(file)?);
    Ok(())
}

fn cmd_node(project_root: &Path, node_id: u64) -> Result<()> {
    let index = load_index(project_root)?;
    let node = index
        .node(node_id)
        .with_context(|| format!("node not found: {}", node_id))?;
    println!("{}", serde_json::to_string_pretty(&node.detail())?);
    Ok(())
}

fn cmd_slice(path: &Path, start_byte: usize, end_byte: usize) -> Result<()> {
    let slice = read_slice(path, start_byte, end_byte)?;
    println!("{}", serde_json::to_string_pretty(&slice)?);
    Ok(())
}

fn cmd_info(project_root: &Path) -> Result<()> {
    let index = load_index(project_root)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "version": index.version,
            "stats": index.stats(),
        }))?
    );
    Ok(())
}
