use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ladder_board::bracket::{parse_game_name, ParsedGame, Stage, TournamentFormat};
use ladder_board::config::AppConfig;
use ladder_board::models::EventId;
use ladder_board::storage::open_source;
use ladder_board::views::{self, Pagination};

#[derive(Parser)]
#[command(name = "ladder-board")]
#[command(about = "Tournament rating leaderboard and bracket viewer")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Players ordered by rating
    Leaderboard {
        #[arg(long)]
        page: Option<u32>,

        #[arg(long)]
        page_size: Option<u32>,
    },

    /// All tournaments, newest first
    Tournaments,

    /// Bracket of one tournament
    Tournament {
        /// Event id
        id: EventId,
    },

    /// Player profile with rating history and nemeses
    Player { username: String },

    /// Rated events grouped by year
    History,

    /// Show how a game name is classified
    Parse {
        name: String,

        /// Event name used to pick the tournament format
        #[arg(long)]
        event_name: Option<String>,
    },
}

#[derive(Serialize)]
struct ParseOutput<'a> {
    name: &'a str,
    format: TournamentFormat,
    /// Elimination stage, absent for rounds, tiers and unknown names
    #[serde(skip_serializing_if = "Option::is_none")]
    stage: Option<Stage>,
    #[serde(flatten)]
    parsed: ParsedGame,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    let log_level = cli.log_level.unwrap_or_else(|| config.log_level.clone());

    // Initialize tracing; stdout is reserved for JSON output
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));
    let json_layer = cli
        .json_logs
        .then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr));
    let text_layer = (!cli.json_logs)
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    tracing::info!("Starting ladder-board v{}", env!("CARGO_PKG_VERSION"));

    if let Commands::Parse { name, event_name } = &cli.command {
        let format = TournamentFormat::detect(event_name.as_deref());
        let parsed = parse_game_name(Some(name.as_str()), format);
        return print_json(&ParseOutput {
            name: name.as_str(),
            format,
            stage: parsed.stage(),
            parsed,
        });
    }

    let source = open_source(&config).context("opening data source")?;
    tracing::info!("Reading from {} source", source.name());
    let batch_size = config.query.batch_size;

    match cli.command {
        Commands::Leaderboard { page, page_size } => {
            let pagination = Pagination::new(page, page_size);
            print_json(&views::leaderboard(source.as_ref(), &pagination).await?)
        }
        Commands::Tournaments => {
            print_json(&views::tournament_list(source.as_ref(), batch_size).await?)
        }
        Commands::Tournament { id } => {
            print_json(&views::tournament_bracket(source.as_ref(), id, batch_size).await?)
        }
        Commands::Player { username } => {
            print_json(&views::player_profile(source.as_ref(), &username, batch_size).await?)
        }
        Commands::History => print_json(&views::events_by_year(source.as_ref()).await?),
        // Printed above without opening a source
        Commands::Parse { .. } => Ok(()),
    }
}
