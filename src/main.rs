//! imexport - batch import/export from the command line
//!
//! Runs the built-in business pipelines against the configured storage and
//! task store, printing results as JSON.

#![allow(missing_docs)]

use clap::{Args, Parser, Subcommand};
use imexport_rs::business::{default_registry, users::UserDirectory};
use imexport_rs::core::task::TaskQuery;
use imexport_rs::{Config, FileFormat, Pipeline, PipelineError, Result};
use imexport_rs::{TaskKind, TaskStatus};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Parser)]
#[command(name = "imexport", version, about = "Batch import/export pipeline")]
struct Cli {
    /// Configuration file; environment variables are used when absent
    #[arg(long, short, global = true, env = "IMEXPORT_CONFIG")]
    config: Option<PathBuf>,

    /// File format for generated files
    #[arg(long, global = true)]
    format: Option<FileFormat>,

    /// Submit the run to the worker pool and wait for its handle
    #[arg(long = "async", global = true)]
    run_async: bool,

    /// Recorded as the task creator
    #[arg(long, global = true)]
    created_by: Option<String>,

    /// Business type to operate on
    #[arg(long, short, global = true, default_value = "user")]
    business: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Export records into a file
    Export(ExportArgs),
    /// Upload a local file and import it
    Import {
        /// Path of the CSV or XLSX file to import
        path: PathBuf,
    },
    /// Generate an empty import template
    Template {
        /// Print a signed download URL instead of the file reference
        #[arg(long)]
        url: bool,
    },
    /// Show one task
    Task {
        /// Task id
        id: i64,
    },
    /// List recent tasks
    Tasks(TasksArgs),
    /// List registered business types
    Businesses,
}

#[derive(Debug, Args)]
struct ExportArgs {
    /// Query parameters as a JSON object
    #[arg(long, default_value = "{}")]
    params: String,

    /// Only export users from this department
    #[arg(long)]
    department: Option<String>,
}

#[derive(Debug, Args)]
struct TasksArgs {
    #[arg(long)]
    kind: Option<TaskKind>,

    #[arg(long)]
    status: Option<TaskStatus>,

    #[arg(long, default_value_t = 20)]
    limit: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Print error using Display (not Debug) to preserve newlines
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).await?;
    imexport_rs::utils::logging::init_logging(config.logging())?;
    let build = imexport_rs::build_info();
    debug!(
        version = build.version,
        commit = build.git_commit,
        rustc = build.rust_version,
        "imexport starting"
    );

    let mut pipeline = Pipeline::from_config(&config).await?;
    if let Some(format) = cli.format {
        pipeline = pipeline.with_format(format);
    }

    let registry = default_registry(Arc::new(UserDirectory::with_sample_users()))?;
    let created_by = cli.created_by.as_deref();

    match cli.command {
        Command::Export(args) => {
            let handler = registry.get(&cli.business)?;
            let params = export_params(&args)?;
            let file_ref = if cli.run_async {
                let handle = handler
                    .submit_export(&pipeline, params, cli.created_by.clone())
                    .await?;
                info!("Submitted export task {}", handle.task_id());
                handle.wait().await?
            } else {
                handler.export(&pipeline, &params, created_by).await?
            };
            print_json(&serde_json::json!({ "fileRef": file_ref }))
        }
        Command::Import { path } => {
            let handler = registry.get(&cli.business)?;
            let source_ref = upload(&pipeline, &path).await?;
            let result = if cli.run_async {
                let handle = handler
                    .submit_import(&pipeline, source_ref, cli.created_by.clone())
                    .await?;
                info!("Submitted import task {}", handle.task_id());
                handle.wait().await?
            } else {
                handler.import(&pipeline, &source_ref, created_by).await?
            };
            print_json(&result)
        }
        Command::Template { url } => {
            let handler = registry.get(&cli.business)?;
            if url {
                let ttl = config.runtime().template_url_ttl();
                let url = handler.generate_template_download_url(&pipeline, ttl).await?;
                print_json(&serde_json::json!({ "url": url }))
            } else {
                let file_ref = handler.generate_template(&pipeline).await?;
                print_json(&serde_json::json!({ "fileRef": file_ref }))
            }
        }
        Command::Task { id } => print_json(&pipeline.tasks().get(id).await?),
        Command::Tasks(args) => {
            let query = TaskQuery {
                kind: args.kind,
                business_type: None,
                status: args.status,
                limit: Some(args.limit),
            };
            print_json(&pipeline.tasks().list(&query).await?)
        }
        Command::Businesses => print_json(&registry.business_types()),
    }
}

fn export_params(args: &ExportArgs) -> Result<serde_json::Value> {
    let mut params: serde_json::Value = serde_json::from_str(&args.params)
        .map_err(|e| PipelineError::validation(format!("Invalid --params JSON: {}", e)))?;
    if let Some(department) = &args.department {
        match params.as_object_mut() {
            Some(object) => {
                object.insert("department".to_string(), department.clone().into());
            }
            None => {
                return Err(PipelineError::validation("--params must be a JSON object"));
            }
        }
    }
    Ok(params)
}

async fn upload(pipeline: &Pipeline, path: &Path) -> Result<String> {
    let content = tokio::fs::read(path).await.map_err(|e| {
        PipelineError::file_storage(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();
    let content_type = FileFormat::from_file_name(&name)
        .map(|f| f.content_type())
        .unwrap_or("application/octet-stream");

    let file_ref = pipeline.storage().put(&content, &name, content_type).await?;
    info!("Uploaded {} as {}", path.display(), file_ref);
    Ok(file_ref)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{}", rendered);
    Ok(())
}
