//! Special commands parser for the interactive chat loop
//!
//! Parses `/`-prefixed commands entered during an interactive chat
//! session. Special commands manage sessions and the backend connection;
//! anything else is sent to the advisor as a question.
//!
//! Commands are case-insensitive.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },

    /// Command was given an argument it cannot use
    #[error("Invalid argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    InvalidArgument { command: String, arg: String },
}

/// Special commands recognized during an interactive chat
///
/// These commands act on local state or the backend connection rather
/// than being sent to the advisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Create a new session and make it active
    NewSession,

    /// Refresh and display the session list
    ///
    /// Doubles as the manual retry affordance for a failed list fetch.
    ListSessions,

    /// Select a session by id and load its history
    Select(i64),

    /// Deselect the current session and clear the timeline
    CloseSession,

    /// Delete a session by id
    Delete(i64),

    /// Re-run the backend health check
    ///
    /// Doubles as the manual retry affordance while disconnected.
    Health,

    /// Show knowledge base statistics
    Stats,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be sent to the advisor as a question.
    None,
}

/// Parse a user input string into a special command
///
/// Commands are case-insensitive. Bare `exit` and `quit` are accepted as
/// exits for convenience; any other input not starting with `/` is a
/// regular question.
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` for an unrecognized `/` command,
/// `MissingArgument` when `/select` or `/delete` lack an id, and
/// `InvalidArgument` when the id does not parse as an integer.
///
/// # Examples
///
/// ```
/// use materna::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(
///     parse_special_command("/select 4").unwrap(),
///     SpecialCommand::Select(4)
/// );
/// assert_eq!(
///     parse_special_command("What about caffeine?").unwrap(),
///     SpecialCommand::None
/// );
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();

    // Bare exit words work without the slash prefix.
    match trimmed.to_lowercase().as_str() {
        "exit" | "quit" => return Ok(SpecialCommand::Exit),
        _ => {}
    }

    if !trimmed.starts_with('/') {
        return Ok(SpecialCommand::None);
    }

    let mut parts = trimmed.split_whitespace();
    let command = parts.next().unwrap_or("").to_lowercase();
    let arg = parts.next();

    match command.as_str() {
        "/new" => Ok(SpecialCommand::NewSession),
        "/sessions" | "/list" => Ok(SpecialCommand::ListSessions),
        "/select" => parse_id_argument(&command, "/select <id>", arg).map(SpecialCommand::Select),
        "/close" => Ok(SpecialCommand::CloseSession),
        "/delete" => parse_id_argument(&command, "/delete <id>", arg).map(SpecialCommand::Delete),
        "/health" => Ok(SpecialCommand::Health),
        "/stats" => Ok(SpecialCommand::Stats),
        "/help" => Ok(SpecialCommand::Help),
        "/quit" | "/exit" => Ok(SpecialCommand::Exit),
        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}

fn parse_id_argument(
    command: &str,
    usage: &str,
    arg: Option<&str>,
) -> Result<i64, CommandError> {
    let arg = arg.ok_or_else(|| CommandError::MissingArgument {
        command: command.to_string(),
        usage: usage.to_string(),
    })?;

    arg.parse::<i64>().map_err(|_| CommandError::InvalidArgument {
        command: command.to_string(),
        arg: arg.to_string(),
    })
}

/// Print help for the interactive chat loop
pub fn print_help() {
    println!("\nAvailable commands:");
    println!("  /new            Create a new chat session");
    println!("  /sessions       Refresh and show the session list");
    println!("  /select <id>    Switch to a session and load its history");
    println!("  /close          Deselect the current session");
    println!("  /delete <id>    Delete a session");
    println!("  /health         Re-check the backend connection");
    println!("  /stats          Show knowledge base statistics");
    println!("  /help           Show this help");
    println!("  /quit           Exit (also: exit, quit)");
    println!("\nAnything else is sent to the advisor as a question.\n");
}
