//! Backend status command

use colored::Colorize;

use crate::config::Config;
use crate::error::Result;
use crate::gateway::{AdvisorGateway, HttpGateway};

/// Handle the status command: health check plus knowledge base stats
///
/// Neither failure is fatal; the command reports what it can reach and
/// exits cleanly so it can be re-run as the retry affordance.
pub async fn handle_status(config: Config) -> Result<()> {
    let gateway = HttpGateway::new(&config)?;

    println!("Backend: {}", gateway.base_url());

    match gateway.health().await {
        Ok(health) if health.healthy => {
            println!("{}", "Health: healthy".green());
        }
        Ok(health) => {
            let detail = health.detail.unwrap_or_else(|| "not healthy".to_string());
            println!("{}", format!("Health: {}", detail).yellow());
        }
        Err(err) => {
            println!("{}", format!("Health: unreachable ({})", err).red());
            println!("Re-run {} to retry.", "materna status".cyan());
            return Ok(());
        }
    }

    match gateway.stats().await {
        Ok(stats) => {
            println!("Knowledge base: {} chunks indexed", stats.total_chunks);
        }
        Err(err) => {
            println!("{}", format!("Stats unavailable: {}", err).yellow());
        }
    }

    Ok(())
}
