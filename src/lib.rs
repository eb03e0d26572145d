//! Materna - terminal chat client for the pregnancy advisor backend
//!
//! This library provides the client-side half of the Materna advisor: the
//! session and message synchronization engine, the HTTP gateway to the
//! backend, and the configuration surface for the CLI.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `sync`: Session store, message timeline, sync engine, and recency bucketing
//! - `gateway`: Backend endpoint wrappers and response normalization
//! - `commands`: CLI command handlers (interactive chat, sessions, status)
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use materna::{Config, HttpGateway, SyncEngine};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let gateway = Arc::new(HttpGateway::new(&config)?);
//!     let mut engine = SyncEngine::new(gateway, config.chat.clone());
//!     engine.refresh_sessions().await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod gateway;
pub mod sync;

// Re-export commonly used types
pub use config::Config;
pub use error::{GatewayError, MaternaError, Result};
pub use gateway::{AdvisorGateway, HttpGateway};
pub use sync::{ChatSession, MessageTimeline, MessageTurn, SessionStore, SyncEngine, TurnStatus};

#[cfg(test)]
pub mod test_utils;
