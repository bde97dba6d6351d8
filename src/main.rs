use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tennis_history::api::routes::players::{load_player_details, load_player_wl};
use tennis_history::api::routes::stats::compute_point_stats;
use tennis_history::api::routes::tournament::load_champion_scores;
use tennis_history::api::routes::wl_index::compute_wl_index;
use tennis_history::api::{build_router, state::AppState, RouterOptions};
use tennis_history::config::AppConfig;
use tennis_history::graph::{GraphExecutor, Neo4jHttpExecutor};
use tennis_history::models::{Draw, Level, Surface, Tour};
use tennis_history::schema::PlayerMatchQuery;
use tennis_history::storage::GraphStore;

#[derive(Parser)]
#[command(name = "tennis-history")]
#[command(about = "Tennis player statistics over a Neo4j graph")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Player id and match filters shared by the per-match reports.
#[derive(Args)]
struct MatchFilterArgs {
    /// Player id
    #[arg(long)]
    id: String,

    /// Edition years to include (comma-separated)
    #[arg(long, value_delimiter = ',')]
    years: Vec<i32>,

    /// Levels to include: Tour, Challenger, ITF (comma-separated)
    #[arg(long, value_delimiter = ',')]
    levels: Vec<Level>,

    /// Main or Qualifying
    #[arg(long)]
    draw_type: Option<Draw>,

    /// ATP, WTA, Men or Women
    #[arg(long)]
    tour: Option<Tour>,

    /// Surfaces to include: Clay, Grass, Hard, Carpet (comma-separated)
    #[arg(long, value_delimiter = ',')]
    surfaces: Vec<Surface>,
}

impl MatchFilterArgs {
    /// Validated the same way as a request body.
    fn query(&self) -> Result<PlayerMatchQuery> {
        let body = serde_json::json!({
            "id": self.id,
            "years": self.years,
            "levels": self.levels,
            "drawType": self.draw_type,
            "tour": self.tour,
            "surfaces": self.surfaces,
        });
        Ok(PlayerMatchQuery::from_json(&body)?)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Host to bind to (defaults to server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (defaults to server.port)
        #[arg(long)]
        port: Option<u16>,

        /// Log every request
        #[arg(long)]
        access_log: bool,
    },

    /// Print a player's win-loss index as JSON
    WlIndex {
        #[command(flatten)]
        filter: MatchFilterArgs,
    },

    /// Print a player's serve and return stats as JSON
    Stats {
        #[command(flatten)]
        filter: MatchFilterArgs,
    },

    /// Print set and game totals of a tournament's champions as JSON
    Champions {
        /// Tournament id
        #[arg(long)]
        id: i64,
    },

    /// Print a player's details, win-loss summary and head-to-head as JSON
    Details {
        /// Player id
        #[arg(long)]
        id: String,

        /// Only print the win-loss summary
        #[arg(long)]
        wl_only: bool,
    },

    /// Check the graph store is reachable
    Ping,
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_or_default(Path::new(&cli.config))
        .with_context(|| format!("failed to load config from {}", cli.config))?;

    let log_level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    init_tracing(log_level, cli.json_logs);

    tracing::info!("Starting tennis-history v{}", env!("CARGO_PKG_VERSION"));

    let executor: Arc<dyn GraphExecutor> = Arc::new(
        Neo4jHttpExecutor::from_config(&config.graph)
            .context("failed to set up the graph executor")?,
    );

    match cli.command {
        Commands::Serve {
            host,
            port,
            access_log,
        } => {
            let state = AppState::new(executor);
            let options = RouterOptions {
                cors_origin: config.server.cors_origin.clone(),
                access_log,
            };
            let app = build_router(state, &options);

            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::WlIndex { filter } => {
            let store = GraphStore::new(executor);
            let rows = compute_wl_index(&store, &filter.query()?).await?;
            print_json(&rows)?;
        }
        Commands::Stats { filter } => {
            let store = GraphStore::new(executor);
            let rows = compute_point_stats(&store, &filter.query()?).await?;
            print_json(&rows)?;
        }
        Commands::Champions { id } => {
            let store = GraphStore::new(executor);
            print_json(&load_champion_scores(&store, id).await?)?;
        }
        Commands::Details { id, wl_only } => {
            let store = GraphStore::new(executor);
            if wl_only {
                print_json(&load_player_wl(&store, &id).await?)?;
            } else {
                print_json(&load_player_details(&store, &id).await?)?;
            }
        }
        Commands::Ping => {
            let reachable = executor.health_check().await?;
            if reachable {
                println!("{}: reachable", executor.name());
            } else {
                anyhow::bail!("{}: graph store did not answer", executor.name());
            }
        }
    }

    Ok(())
}
