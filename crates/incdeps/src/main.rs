//! incdeps CLI - include dependency graphs from the command line.
//!
//! `incdeps build` catalogs a C/C++ tree and writes its include graph;
//! `incdeps who-uses` lists every file affected by a change to one file.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

mod cli;

/// incdeps: C/C++ include dependency graph builder and query tool.
#[derive(Parser)]
#[command(name = "incdeps")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Root directory to catalog (defaults to the current directory)
    #[arg(short, long, global = true)]
    scan_path: Option<PathBuf>,

    /// Graph artifact location (defaults to <scan-path>/.incdeps/graph.jsonl)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Catalog the scan path and write its include graph
    Build {
        /// Include-search root, tried in the order given (defaults to the scan path)
        #[arg(short = 'I', long = "include")]
        include_roots: Vec<PathBuf>,

        /// Allowed file name suffix, replacing the defaults (e.g. ".hpp")
        #[arg(long = "extension")]
        extensions: Vec<String>,

        /// Regex over `/`-normalized paths; matching files are ignored
        #[arg(long)]
        blacklist: Vec<String>,
    },

    /// List every file that transitively includes a file
    WhoUses {
        /// File under the scan path
        file: PathBuf,

        /// Print the result as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Show graph statistics
    Stats {
        /// Number of most-included files to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let global = cli::GlobalOptions {
        config: cli.config,
        scan_path: cli.scan_path,
        output: cli.output,
    };

    let result = match cli.command {
        Commands::Build {
            include_roots,
            extensions,
            blacklist,
        } => {
            let overrides = cli::BuildOverrides {
                include_roots,
                extensions,
                blacklist,
            };
            cli::build::run(&global, overrides).await
        }
        Commands::WhoUses { file, json } => cli::who_uses::run(&global, &file, json).await,
        Commands::Stats { limit } => cli::stats::run(&global, limit).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            // Show cause chain for nested errors
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  {}: {cause}", "caused by".dimmed());
                source = std::error::Error::source(cause);
            }
            ExitCode::FAILURE
        }
    }
}
