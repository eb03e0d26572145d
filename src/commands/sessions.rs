//! Session management commands

use chrono::Utc;
use colored::Colorize;
use prettytable::{format, Table};

use crate::cli::SessionCommand;
use crate::config::Config;
use crate::error::{MaternaError, Result};
use crate::gateway::{AdvisorGateway, HttpGateway};
use crate::sync::buckets::bucket_for;

/// Handle session commands
pub async fn handle_sessions(config: Config, command: SessionCommand) -> Result<()> {
    let gateway = HttpGateway::new(&config)?;

    match command {
        SessionCommand::List => {
            let sessions = gateway
                .list_sessions()
                .await
                .map_err(MaternaError::from)?;

            if sessions.is_empty() {
                println!("{}", "No chat sessions yet.".yellow());
                return Ok(());
            }

            let now = Utc::now();
            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

            table.add_row(prettytable::row![
                "ID".bold(),
                "Name".bold(),
                "Messages".bold(),
                "Last Activity".bold(),
                "Recency".bold()
            ]);

            for session in sessions {
                let name = {
                    let full = session.display_name();
                    if full.len() > 40 {
                        format!("{}...", &full[..37])
                    } else {
                        full
                    }
                };
                let activity = match session.last_activity_at {
                    Some(ts) => ts.format("%Y-%m-%d %H:%M").to_string(),
                    None => "No messages yet".to_string(),
                };
                let bucket = bucket_for(now, session.last_activity_at);

                table.add_row(prettytable::row![
                    session.session_id.to_string().cyan(),
                    name,
                    session.message_count,
                    activity,
                    bucket.label()
                ]);
            }

            println!("\nChat Sessions:");
            table.printstd();
            println!();
            println!(
                "Use {} to resume a session.",
                "materna chat --session <ID>".cyan()
            );
            println!();
        }
        SessionCommand::Delete { id } => {
            gateway
                .delete_session(id)
                .await
                .map_err(MaternaError::from)?;
            println!("{}", format!("Deleted session {}", id).green());
        }
    }

    Ok(())
}
