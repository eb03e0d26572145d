/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

It exposes three top-level command modules:

- `chat`     — Interactive chat loop against the advisor backend
- `sessions` — List and delete chat sessions
- `status`   — Backend health and knowledge base statistics

These handlers are intentionally small and use the library components:
the gateway and the sync engine.
*/

use chrono::Utc;
use colored::Colorize;

use crate::sync::buckets::group_by_recency;
use crate::sync::sessions::ChatSession;
use crate::sync::timeline::{MessageTurn, TurnStatus};

// Special commands parser for the chat loop
pub mod special_commands;

// Session management commands
pub mod sessions;

// Backend status command
pub mod status;

/// Render the session list grouped by recency
///
/// Only non-empty buckets print a header; a session with no recency
/// timestamp shows "No messages yet" and sits under "Older".
pub(crate) fn print_session_sidebar(sessions: &[ChatSession]) {
    if sessions.is_empty() {
        println!("{}", "No chat sessions yet. Use /new to start one.".yellow());
        return;
    }

    let buckets = group_by_recency(Utc::now(), sessions);
    for (bucket, entries) in buckets.sections() {
        if entries.is_empty() {
            continue;
        }
        println!("{}", bucket.label().bold());
        for session in entries {
            let activity = match session.last_activity_at {
                Some(ts) => ts.format("%Y-%m-%d %H:%M").to_string(),
                None => "No messages yet".to_string(),
            };
            println!(
                "  [{}] {} — {} messages, {}",
                session.session_id.to_string().cyan(),
                session.display_name(),
                session.message_count,
                activity.dimmed()
            );
        }
    }
    println!();
}

/// Render one turn: the user's question and the advisor's answer (or state)
pub(crate) fn print_turn(turn: &MessageTurn) {
    println!("{} {}", "You:".blue().bold(), turn.user_text);
    match turn.status {
        TurnStatus::Complete => {
            if let Some(answer) = &turn.assistant_text {
                println!("{} {}", "Advisor:".green().bold(), answer);
            }
            if let Some(ms) = turn.response_latency_ms {
                println!("{}", format!("Responded in {:.2}s", ms as f64 / 1000.0).dimmed());
            }
        }
        TurnStatus::Failed => {
            if let Some(apology) = &turn.assistant_text {
                println!("{} {}", "Advisor:".red().bold(), apology.red());
            }
        }
        TurnStatus::Pending => {
            println!("{}", "Advisor: ...".dimmed());
        }
    }
    println!();
}

// Chat command handler
pub mod chat {
    //! Interactive chat loop handler.
    //!
    //! Builds the HTTP gateway and sync engine, then runs a readline-based
    //! loop that dispatches special commands and sends everything else to
    //! the advisor.

    use super::*;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;
    use std::sync::Arc;

    use crate::commands::special_commands::{
        parse_special_command, print_help, SpecialCommand,
    };
    use crate::config::Config;
    use crate::error::Result;
    use crate::gateway::HttpGateway;
    use crate::sync::engine::SyncEngine;

    /// Start the interactive chat loop
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `session` - Optional session id to resume
    pub async fn run_chat(config: Config, session: Option<i64>) -> Result<()> {
        let gateway = Arc::new(HttpGateway::new(&config)?);
        let mut engine = SyncEngine::new(gateway, config.chat.clone());

        print_connection_banner(&engine).await;

        // Best effort: the chunk count is informational only.
        if let Ok(stats) = engine.stats().await {
            println!(
                "{}",
                format!("Knowledge base: {} chunks indexed", stats.total_chunks).dimmed()
            );
        }

        let refreshed = engine.refresh_sessions().await;
        match refreshed {
            Ok(()) => print_session_sidebar(engine.store().sessions()),
            Err(err) => eprintln!(
                "{}",
                format!("Failed to load sessions: {} (use /sessions to retry)", err).yellow()
            ),
        }

        if let Some(id) = session {
            let selected = engine.select_session(id).await;
            match selected {
                Ok(()) => {
                    println!("Resumed session {}:\n", id.to_string().cyan());
                    for turn in engine.timeline().turns() {
                        print_turn(turn);
                    }
                }
                Err(err) => eprintln!("{}", format!("Failed to resume session {}: {}", id, err).red()),
            }
        }

        println!("Type a question, or /help for commands.\n");

        let mut rl = DefaultEditor::new()?;

        loop {
            let prompt = match engine.store().active_id() {
                Some(id) => format!("[chat {}] >> ", id),
                None => "[no chat] >> ".to_string(),
            };

            match rl.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    rl.add_history_entry(trimmed)?;

                    let command = match parse_special_command(trimmed) {
                        Ok(command) => command,
                        Err(err) => {
                            println!("{}", err.to_string().yellow());
                            continue;
                        }
                    };

                    match command {
                        SpecialCommand::NewSession => match engine.create_session().await {
                            Ok(id) => println!("{}", format!("Started chat {}\n", id).green()),
                            Err(err) => {
                                eprintln!("{}", format!("Failed to create session: {}", err).red())
                            }
                        },
                        SpecialCommand::ListSessions => {
                            let refreshed = engine.refresh_sessions().await;
                            match refreshed {
                                Ok(()) => print_session_sidebar(engine.store().sessions()),
                                Err(err) => eprintln!(
                                    "{}",
                                    format!(
                                        "Failed to load sessions: {} (retry with /sessions)",
                                        err
                                    )
                                    .red()
                                ),
                            }
                        }
                        SpecialCommand::Select(id) => {
                            let selected = engine.select_session(id).await;
                            match selected {
                                Ok(()) => {
                                    if engine.store().active_id() == Some(id) {
                                        println!(
                                            "Switched to session {}:\n",
                                            id.to_string().cyan()
                                        );
                                        for turn in engine.timeline().turns() {
                                            print_turn(turn);
                                        }
                                    } else {
                                        println!(
                                            "{}",
                                            format!("Session id {} is not selectable", id).yellow()
                                        );
                                    }
                                }
                                Err(err) => eprintln!(
                                    "{}",
                                    format!("Failed to load history for {}: {}", id, err).red()
                                ),
                            }
                        }
                        SpecialCommand::CloseSession => {
                            engine.clear_selection();
                            println!("Closed the current session.\n");
                        }
                        SpecialCommand::Delete(id) => match engine.delete_session(id).await {
                            Ok(()) => println!("{}", format!("Deleted session {}\n", id).green()),
                            Err(err) => {
                                eprintln!("{}", format!("Failed to delete {}: {}", id, err).red())
                            }
                        },
                        SpecialCommand::Health => print_connection_banner(&engine).await,
                        SpecialCommand::Stats => match engine.stats().await {
                            Ok(stats) => println!(
                                "Knowledge base: {} chunks indexed\n",
                                stats.total_chunks
                            ),
                            Err(err) => {
                                eprintln!("{}", format!("Failed to fetch stats: {}", err).red())
                            }
                        },
                        SpecialCommand::Help => print_help(),
                        SpecialCommand::Exit => break,
                        SpecialCommand::None => {
                            let sent = engine.send_message(trimmed).await;
                            match sent {
                                Ok(turn_id) => {
                                    if let Some(turn) = engine.timeline().get_turn(turn_id) {
                                        print_turn(turn);
                                    }
                                }
                                Err(err) => {
                                    eprintln!("{}", format!("Failed to send: {}", err).red())
                                }
                            }
                        }
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("Readline error: {}", err);
                    break;
                }
            }
        }

        println!("Goodbye.");
        Ok(())
    }

    /// Show connection state; also the manual retry path via /health
    async fn print_connection_banner(engine: &SyncEngine) {
        match engine.health().await {
            Ok(health) if health.healthy => {
                println!("{}", "Connected to the pregnancy advisor backend.".green());
            }
            Ok(health) => {
                let detail = health.detail.unwrap_or_else(|| "not healthy".to_string());
                println!(
                    "{}",
                    format!(
                        "Backend is not healthy: {} (retry with /health)",
                        detail
                    )
                    .yellow()
                );
            }
            Err(err) => {
                println!(
                    "{}",
                    format!(
                        "Unable to connect to the backend: {} (retry with /health)",
                        err
                    )
                    .yellow()
                );
            }
        }
    }
}
