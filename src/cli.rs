//! Command-line interface definition for Materna
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for the interactive chat loop, session management,
//! and backend status.

use clap::{Parser, Subcommand};

/// Materna - terminal chat client for the pregnancy advisor backend
///
/// Talks to the advisor backend over plain JSON HTTP; all retrieval,
/// answer generation, and persistence is owned by the backend.
#[derive(Parser, Debug, Clone)]
#[command(name = "materna")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Override the backend base URL from config
    #[arg(long)]
    pub api_base: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Materna
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the interactive chat loop
    Chat {
        /// Resume an existing session by id
        #[arg(short, long)]
        session: Option<i64>,
    },

    /// Manage chat sessions
    Sessions {
        /// Session management subcommand
        #[command(subcommand)]
        command: SessionCommand,
    },

    /// Show backend health and knowledge base statistics
    Status,
}

/// Session management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SessionCommand {
    /// List sessions grouped by recency
    List,

    /// Delete a session
    Delete {
        /// Session id to delete
        id: i64,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            api_base: None,
            verbose: false,
            command: Commands::Status,
        }
    }
}
