mod commands;
mod render;
mod script;

use std::path::PathBuf;

use anyhow::{Context, Result};
use calgrid_core::config::BuilderConfig;
use calgrid_core::date_range::{end_of_day, parse_date, start_of_day};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "calgrid")]
#[command(about = "Replay calendar grid gestures against the calgrid event model")]
struct Cli {
    /// Builder config file (defaults to ~/.config/calgrid/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log store and shift decisions
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a gesture script and print the resulting events
    Replay {
        script: PathBuf,

        /// Print the grid's render input as JSON instead
        #[arg(long)]
        json: bool,

        /// List occurrences from this date (YYYY-MM-DD)
        #[arg(long, requires = "to")]
        from: Option<String>,

        /// List occurrences until this date (YYYY-MM-DD)
        #[arg(long, requires = "from")]
        to: Option<String>,
    },
    /// Show the effective builder config
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = match cli.config {
        Some(path) => path,
        None => BuilderConfig::config_path()?,
    };
    let config = BuilderConfig::load(&config_path)
        .with_context(|| format!("Could not load config from {}", config_path.display()))?;

    match cli.command {
        Commands::Replay {
            script,
            json,
            from,
            to,
        } => {
            let window = match (from, to) {
                (Some(from), Some(to)) => {
                    let from = parse_date(&from).map_err(anyhow::Error::msg)?;
                    let to = parse_date(&to).map_err(anyhow::Error::msg)?;
                    Some((start_of_day(from), end_of_day(to)))
                }
                _ => None,
            };
            commands::replay::run(&script, config, json, window)
        }
        Commands::Config => commands::config::run(&config, &config_path),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "calgrid_core=debug,calgrid_cli=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
