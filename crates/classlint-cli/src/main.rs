//! classlint CLI tool.
//!
//! Usage:
//! ```bash
//! classlint check [OPTIONS] [LOCATIONS]...
//! classlint list-rules
//! classlint init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Architecture rules for compiled JVM applications
#[derive(Parser)]
#[command(name = "classlint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "CLASSLINT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import compiled classes and evaluate the rules
    Check {
        /// Class directories or .jar/.zip archives (default: [import] locations)
        locations: Vec<PathBuf>,

        /// Only analyze classes under this package (can be specified multiple times)
        #[arg(short, long = "package")]
        packages: Vec<String>,

        /// Root package of the application (default: derived from the classes)
        #[arg(long)]
        base_package: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific rules (comma-separated)
        #[arg(long)]
        rules: Option<String>,

        /// Exclude artifacts matching a glob (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,
    },

    /// List presets and built-in rules
    ListRules,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Check {
            locations,
            packages,
            base_package,
            format,
            rules,
            exclude,
        } => {
            let cwd = std::env::current_dir()?;
            let source = config_resolver::resolve(&cwd, cli.config.as_deref());
            let args = commands::check::CheckArgs {
                locations,
                packages,
                base_package,
                rules,
                exclude,
            };
            let failed = commands::check::run(args, format, &source)?;
            if failed {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::ListRules => commands::list_rules::run(),
        Commands::Init { force } => commands::init::run(force),
    }
}
