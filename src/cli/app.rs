//! CLI definitions and entry point

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::commands;
use ktlint_cache::core::models::Mode;
use ktlint_cache::output::OutputMode;

/// ktlint-cache - Incremental ktlint runs for Kotlin sources
#[derive(Parser, Debug)]
#[command(
    name = "ktlint-cache",
    version,
    about = "Incremental ktlint runs for Kotlin sources",
    long_about = "Lint and format only the Kotlin files that changed.\n\n\
                  Each task keeps a record of content digests so files a previous\n\
                  format pass rewrote are picked up again even when the build\n\
                  lost track of them."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long, global = true)]
    pub json: bool,

    /// Project directory
    #[arg(short = 'C', long, global = true, default_value = ".")]
    pub project_dir: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a starter .ktlint.toml
    Init {
        /// Overwrite an existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Check changed sources without modifying them
    Lint(RunArgs),

    /// Fix changed sources in place
    Format(RunArgs),

    /// Show the recorded state of each task
    Status {
        /// Only this task
        #[arg(short, long)]
        task: Option<String>,
    },

    /// Delete run records and input history
    Clean {
        /// Only this task
        #[arg(short, long)]
        task: Option<String>,
    },

    /// Serve one batch on stdin/stdout (used by process isolation)
    #[command(hide = true)]
    Worker,

    /// Show version
    Version,
}

/// Options shared by `lint` and `format`
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Task to run (default: every task)
    #[arg(short, long)]
    pub task: Option<String>,

    /// File the outer build reports as added or modified
    #[arg(long, value_name = "FILE")]
    pub changed: Vec<PathBuf>,

    /// File the outer build reports as removed
    #[arg(long, value_name = "FILE")]
    pub removed: Vec<PathBuf>,

    /// JSON file of `{"file", "change"}` deltas
    #[arg(long, value_name = "FILE")]
    pub deltas: Option<PathBuf>,

    /// Process every source file regardless of history
    #[arg(long, conflicts_with_all = ["changed", "removed", "deltas"])]
    pub rerun: bool,

    /// Run the engine inside this process
    #[arg(long)]
    pub in_process: bool,
}

/// Run the CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };
    let root = cli.project_dir.as_path();

    match cli.command {
        Some(Command::Init { force }) => commands::init(root, force, output_mode),
        Some(Command::Lint(args)) => commands::run(root, &args, Mode::Lint, output_mode),
        Some(Command::Format(args)) => commands::run(root, &args, Mode::Format, output_mode),
        Some(Command::Status { task }) => commands::status(root, task.as_deref(), output_mode),
        Some(Command::Clean { task }) => commands::clean(root, task.as_deref(), output_mode),
        Some(Command::Worker) => commands::worker(),
        Some(Command::Version) => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": ktlint_cache::VERSION
                    })
                );
            } else {
                println!("ktlint-cache v{}", ktlint_cache::VERSION);
            }
            Ok(())
        },
        None => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": ktlint_cache::VERSION,
                        "hint": "Use --help for usage"
                    })
                );
            } else {
                println!("ktlint-cache v{}", ktlint_cache::VERSION);
                println!("\nRun 'ktlint-cache --help' for usage");
                println!("Run 'ktlint-cache format' to format changed sources");
            }
            Ok(())
        },
    }
}
