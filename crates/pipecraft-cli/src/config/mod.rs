//! CLI configuration management.
//!
//! ```text
//! Cli
//! └── command
//!     ├── serve    ServerConfig + MiddlewareConfig (CORS, recovery)
//!     ├── analyze  DocumentArgs
//!     ├── inspect  DocumentArgs
//!     ├── submit   DocumentArgs + AnalyzerConfig
//!     ├── import   file + StorageConfig
//!     ├── export   StorageConfig + output path
//!     └── clear    StorageConfig
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.

mod middleware;
mod server;
mod storage;

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
pub use middleware::MiddlewareConfig;
use pipecraft_client::AnalyzerConfig;
use serde::{Deserialize, Serialize};
pub use server::ServerConfig;
pub use storage::StorageConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_SERVER_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "pipecraft")]
#[command(about = "Build, validate and analyze pipeline graphs")]
#[command(version)]
pub struct Cli {
    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Every `pipecraft` subcommand.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the HTTP analysis service
    Serve(ServeArgs),
    /// Count nodes and edges of a pipeline and check it is a DAG
    Analyze(AnalyzeArgs),
    /// Validate a pipeline and list its nodes, ports and edges
    Inspect(DocumentArgs),
    /// Send a pipeline to a running analysis service
    Submit(SubmitArgs),
    /// Validate a pipeline file and make it the saved pipeline
    Import(ImportArgs),
    /// Write the saved pipeline to a dated file
    Export(ExportArgs),
    /// Delete the saved pipeline
    Clear(StorageConfig),
}

/// Arguments of `pipecraft serve`.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct ServeArgs {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// HTTP middleware configuration (CORS, timeouts).
    #[clap(flatten)]
    pub middleware: MiddlewareConfig,
}

/// Where a command reads its pipeline from.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct DocumentArgs {
    /// Pipeline document file; the saved pipeline when omitted
    pub path: Option<PathBuf>,

    /// Location of the saved pipeline.
    #[clap(flatten)]
    pub storage: StorageConfig,
}

/// Arguments of `pipecraft analyze`.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct AnalyzeArgs {
    /// Pipeline to analyze.
    #[clap(flatten)]
    pub document: DocumentArgs,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments of `pipecraft submit`.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct SubmitArgs {
    /// Pipeline to submit.
    #[clap(flatten)]
    pub document: DocumentArgs,

    /// Analysis service connection.
    #[clap(flatten)]
    pub analyzer: AnalyzerConfig,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments of `pipecraft import`.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct ImportArgs {
    /// Pipeline document file to import
    pub path: PathBuf,

    /// Location of the saved pipeline.
    #[clap(flatten)]
    pub storage: StorageConfig,
}

/// Arguments of `pipecraft export`.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct ExportArgs {
    /// Output file; `pipeline-<date>.json` in the working directory when omitted
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Location of the saved pipeline.
    #[clap(flatten)]
    pub storage: StorageConfig,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    /// Validates the configuration of the selected command.
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Command::Serve(args) = &self.command {
            args.server
                .validate()
                .context("invalid server configuration")?;
        }
        Ok(())
    }

    /// Logs build information and the selected command's configuration.
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "build information"
        );

        match &self.command {
            Command::Serve(args) => {
                args.server.log();
                args.middleware.log();
            }
            Command::Submit(args) => {
                tracing::debug!(
                    target: TRACING_TARGET_CONFIG,
                    analyzer_url = %args.analyzer.analyzer_url,
                    http_timeout_secs = args.analyzer.http_timeout,
                    "analyzer configuration"
                );
            }
            _ => {}
        }
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}
