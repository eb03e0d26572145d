//! Materna - terminal chat client for the pregnancy advisor backend
//!
#![doc = "Main entry point for the Materna chat client."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use materna::cli::{Cli, Commands};
use materna::commands;
use materna::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat { session } => {
            tracing::info!("Starting interactive chat mode");
            if let Some(id) = session {
                tracing::debug!("Resuming session: {}", id);
            }
            commands::chat::run_chat(config, session).await
        }
        Commands::Sessions { command } => commands::sessions::handle_sessions(config, command).await,
        Commands::Status => commands::status::handle_status(config).await,
    }
}

/// Initialize the tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects debug-level
/// output for the crate.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "materna=debug" } else { "materna=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
