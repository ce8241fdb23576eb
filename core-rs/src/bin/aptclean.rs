//! aptclean - apt archive cache cleaner
//!
//! Command-line interface over the eviction policy

use anyhow::{Context, Result};
use aptclean_core::{
    logging, ArchiveCleaner, CleanConfig, CleanReport, DebianOrdering, DpkgDriver,
    EvictionPolicy, StaticOracle, ToolPaths, VersionComparator, VersionOracle,
};
use chrono::Utc;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(name = "aptclean")]
#[command(version)]
#[command(about = "Delete obsolete package archives from the apt cache", long_about = None)]
struct Cli {
    /// Config file (YAML); defaults to /etc/aptclean/config.yaml when present
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Use this archives directory instead of asking apt-config
    #[arg(long, global = true)]
    archives_dir: Option<PathBuf>,
    /// More log output (-v debug, -vv trace); RUST_LOG overrides
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Delete obsolete archives (the default command)
    Clean {
        /// Decide everything, delete nothing
        #[arg(long, conflicts_with = "no_dry_run")]
        dry_run: bool,
        /// Delete even when the config file sets dryRun
        #[arg(long)]
        no_dry_run: bool,
        /// Report format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Show the verdict for archive files without deleting them
    Explain {
        /// File names inside the archives directory
        #[arg(required = true)]
        files: Vec<String>,
        /// Replay a recorded package state (YAML) instead of asking dpkg/apt
        #[arg(long)]
        state: Option<PathBuf>,
        /// Report format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print the archives directory that would be cleaned
    Dir,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let mut config = CleanConfig::load_or_default(cli.config.as_deref())?;
    if let Some(dir) = cli.archives_dir {
        config.archives_dir = Some(dir);
    }
    debug!(?config, "loaded config");

    match cli.command.unwrap_or(Commands::Clean {
        dry_run: false,
        no_dry_run: false,
        format: OutputFormat::Text,
    }) {
        Commands::Clean { dry_run, no_dry_run, format } => {
            let dry_run = resolve_dry_run(dry_run, no_dry_run, config.dry_run);
            let tools = ToolPaths::discover(&config.tools)?;
            let archives_dir = config.archives_dir(&tools)?;
            let driver = DpkgDriver::new(tools);

            let policy = EvictionPolicy::new(driver.clone(), driver);
            let cleaner = ArchiveCleaner::new(archives_dir, policy).dry_run(dry_run);
            let report = cleaner.run().context("Archive cleaning aborted")?;
            print_report(&report, format)?;
        }

        Commands::Explain { files, state, format } => {
            let report = match state {
                Some(state_path) => {
                    let oracle = StaticOracle::load(&state_path)?;
                    let archives_dir = resolve_dir(&config)?;
                    explain(archives_dir, EvictionPolicy::new(oracle, DebianOrdering), &files)
                }
                None => {
                    let tools = ToolPaths::discover(&config.tools)?;
                    let archives_dir = config.archives_dir(&tools)?;
                    let driver = DpkgDriver::new(tools);
                    explain(archives_dir, EvictionPolicy::new(driver.clone(), driver), &files)
                }
            };
            print_report(&report, format)?;
        }

        Commands::Dir => {
            println!("{}", resolve_dir(&config)?.display());
        }
    }

    Ok(())
}

/// Command-line flags win over the config file
fn resolve_dry_run(dry_run: bool, no_dry_run: bool, from_config: bool) -> bool {
    if no_dry_run {
        false
    } else {
        dry_run || from_config
    }
}

/// Archives directory without requiring every dpkg tool when it is configured
fn resolve_dir(config: &CleanConfig) -> Result<PathBuf> {
    if let Some(dir) = &config.archives_dir {
        return Ok(dir.clone());
    }
    let tools = ToolPaths::discover(&config.tools)?;
    Ok(config.archives_dir(&tools)?)
}

fn explain<O: VersionOracle, C: VersionComparator>(
    archives_dir: PathBuf,
    policy: EvictionPolicy<O, C>,
    files: &[String],
) -> CleanReport {
    ArchiveCleaner::new(archives_dir, policy).explain(files, Utc::now())
}

fn print_report(report: &CleanReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(())
}
