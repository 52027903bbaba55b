//! Fiscus - AI tax and research agent CLI
//!
//! Main entry point: wires configuration, storage, providers, and the
//! search backend together, then dispatches to the command handlers.

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fiscus::agent::Agent;
use fiscus::cli::{Cli, Commands};
use fiscus::commands;
use fiscus::config::Config;
use fiscus::providers::create_provider;
use fiscus::search::{SearchProvider, TavilyClient, UnconfiguredSearch};
use fiscus::storage::SqliteStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load and validate configuration
    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load(&config_path, &cli)?;
    config.validate()?;

    // Open the session store (FISCUS_DB overrides the platform data dir)
    let store = SqliteStore::new()?;

    // Default to interactive chat when no subcommand is given
    let command = cli.command.unwrap_or(Commands::Chat { session: None });

    match command {
        Commands::Chat { session } => {
            let agent = build_agent(config, store)?;
            commands::chat::run_chat(agent, session).await?;
            Ok(())
        }
        Commands::Convert { path, session } => {
            tracing::info!("Starting one-shot conversion for {}", path);
            commands::convert::run_convert(&store, &config, &path, session)?;
            Ok(())
        }
        Commands::History { session } => {
            commands::history::print_conversions(&store, session.as_deref())?;
            Ok(())
        }
        Commands::Sessions { limit } => {
            commands::history::print_sessions(&store, limit)?;
            Ok(())
        }
    }
}

/// Assemble the agent from its collaborators
///
/// A missing search key does not block chat use; search turns report the
/// configuration problem instead.
fn build_agent(config: Config, store: SqliteStore) -> Result<Agent> {
    let provider = create_provider(&config)?;
    tracing::debug!("Using provider: {}", provider.name());

    let search: Box<dyn SearchProvider> =
        match TavilyClient::new(&config.search, config.agent.request_timeout_seconds) {
            Ok(client) => Box::new(client),
            Err(e) => {
                tracing::warn!("Search unavailable: {}", e);
                Box::new(UnconfiguredSearch::new(e.to_string()))
            }
        };

    Ok(Agent::new_boxed(provider, search, store, config))
}

/// Initialize tracing subscriber with environment filter
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "fiscus=debug" } else { "fiscus=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
