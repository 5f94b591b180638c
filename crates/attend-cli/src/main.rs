#![forbid(unsafe_code)]

mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use attend_core::config::{self, TrackerConfig};
use clap::{Parser, Subcommand};
use output::OutputMode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "attend: per-player monthly activity tracker",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Activity data file (overrides the config value).
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// TOML config file.
    #[arg(long, global = true, default_value = "attend.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Record a player-verified event",
        after_help = "EXAMPLES:\n    # Record a visit now\n    att record U1@steam --name Alice\n\n    # Backfill a specific day\n    att record U1@steam --name Alice --at 2024-06-01T12:00:00Z"
    )]
    Record(cmd::record::RecordArgs),

    #[command(about = "Deliver a periodic checkpoint (runs the once-per-day prune gate)")]
    Tick(cmd::tick::TickArgs),

    #[command(about = "Force a retention prune now")]
    Prune(cmd::prune::PruneArgs),

    #[command(
        about = "Show the monthly leaderboard or one player's summary",
        after_help = "EXAMPLES:\n    # Top 20 this month\n    att activity\n\n    # One player, by id or name\n    att activity alice\n\n    # Emit machine-readable output\n    att activity --json"
    )]
    Activity(cmd::activity::ActivityArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    init_tracing(cli.verbose || config.debug);
    tracing::debug!(?config, "resolved config");

    let output = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    match &cli.command {
        Commands::Record(args) => cmd::record::run_record(args, &config, output),
        Commands::Tick(args) => cmd::tick::run_tick(args, &config, output),
        Commands::Prune(args) => cmd::prune::run_prune(args, &config, output),
        Commands::Activity(args) => cmd::activity::run_activity(args, &config, output),
    }
}

fn resolve_config(cli: &Cli) -> Result<TrackerConfig> {
    let mut config = config::load_config(&cli.config)?;
    if let Some(data) = &cli.data {
        config.data_path = data.clone();
    }
    Ok(config)
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("ATTEND_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
