//! Remote sync gateway for the advisor backend
//!
//! The gateway is the sole owner of network I/O. It wraps the six backend
//! endpoints, normalizes the inconsistent response shapes before anything
//! leaves this module, and maps every failure to the typed taxonomy in
//! [`crate::error::GatewayError`]. No call is retried automatically;
//! callers decide whether to retry.

pub mod client;
pub mod types;

pub use client::HttpGateway;
pub use types::{
    ChatTurnReply, ChatTurnRequest, HealthStatus, HistoryMessage, KnowledgeBaseStats,
};

use async_trait::async_trait;

use crate::error::GatewayResult;
use crate::sync::sessions::ChatSession;

/// Seam over the advisor backend endpoints
///
/// The sync engine talks to the backend only through this trait, which
/// keeps it testable with in-process doubles alongside the real
/// [`HttpGateway`].
#[async_trait]
pub trait AdvisorGateway: Send + Sync {
    /// `GET /health` — backend liveness report
    async fn health(&self) -> GatewayResult<HealthStatus>;

    /// `GET /stats` — knowledge base counters
    async fn stats(&self) -> GatewayResult<KnowledgeBaseStats>;

    /// `POST /chat` — submit a question and wait for the answer
    async fn send_chat(&self, request: &ChatTurnRequest) -> GatewayResult<ChatTurnReply>;

    /// `GET /chats` — list sessions, normalized
    async fn list_sessions(&self) -> GatewayResult<Vec<ChatSession>>;

    /// `POST /chats` — create a session; the backend assigns the id
    async fn create_session(&self, session_name: Option<&str>) -> GatewayResult<ChatSession>;

    /// `GET /chats/{id}` — persisted history in backend order
    async fn fetch_history(&self, session_id: i64) -> GatewayResult<Vec<HistoryMessage>>;

    /// `DELETE /chats/{id}` — remove a session
    async fn delete_session(&self, session_id: i64) -> GatewayResult<()>;
}
