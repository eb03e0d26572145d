//! Wire types for the advisor backend endpoints
//!
//! The backend ships session objects under two historical naming
//! conventions (`id` vs `session_id`, `updated_at` vs `last_message_at`).
//! Everything here is tolerant of both; normalization resolves each value
//! to one canonical field before it leaves the gateway.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sync::sessions::ChatSession;

/// Health report from `GET /health`
///
/// An unhealthy backend is a state, not an error: only transport failures
/// surface as gateway errors for this endpoint.
#[derive(Debug, Clone)]
pub struct HealthStatus {
    /// True when the backend reported itself healthy
    pub healthy: bool,
    /// Backend-supplied detail when not healthy
    pub detail: Option<String>,
}

/// Raw body of `GET /health`
#[derive(Debug, Deserialize)]
pub(crate) struct HealthResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
}

/// Raw body of `GET /stats`
#[derive(Debug, Deserialize)]
pub(crate) struct StatsResponse {
    pub knowledge_base_stats: KnowledgeBaseStats,
}

/// Knowledge base counters reported by the backend
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct KnowledgeBaseStats {
    /// Number of indexed knowledge chunks
    pub total_chunks: u64,
}

/// Request body for `POST /chat`
#[derive(Debug, Clone, Serialize)]
pub struct ChatTurnRequest {
    /// The user's question
    pub message: String,
    /// Session to append the turn to; absent for a sessionless probe
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<i64>,
    /// Number of knowledge chunks to retrieve
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    /// Minimum similarity score for retrieved chunks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity_threshold: Option<f32>,
}

/// Response body of `POST /chat`
#[derive(Debug, Clone, Deserialize)]
pub struct ChatTurnReply {
    /// Success envelope marker; anything but "success" is a failure
    #[serde(default)]
    pub status: String,
    /// The advisor's answer text
    #[serde(default)]
    pub response: String,
    /// Backend-side processing time in seconds
    #[serde(default)]
    pub processing_time_seconds: f64,
}

impl ChatTurnReply {
    /// Backend processing time as whole milliseconds
    ///
    /// # Examples
    ///
    /// ```
    /// use materna::gateway::types::ChatTurnReply;
    ///
    /// let reply = ChatTurnReply {
    ///     status: "success".to_string(),
    ///     response: "Avoid raw fish...".to_string(),
    ///     processing_time_seconds: 1.2,
    /// };
    /// assert_eq!(reply.latency_ms(), 1200);
    /// ```
    pub fn latency_ms(&self) -> u64 {
        (self.processing_time_seconds * 1000.0).round().max(0.0) as u64
    }
}

/// Raw body of `GET /chats`
#[derive(Debug, Deserialize)]
pub(crate) struct SessionsResponse {
    #[serde(default)]
    pub sessions: Vec<RawSession>,
}

/// Session object exactly as the backend ships it
///
/// Every field is optional because the two historical backends disagree on
/// names; [`RawSession::normalize`] resolves the variants.
#[derive(Debug, Default, Deserialize)]
pub struct RawSession {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub session_id: Option<i64>,
    #[serde(default)]
    pub session_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub last_message_at: Option<String>,
    #[serde(default)]
    pub message_count: Option<u64>,
}

impl RawSession {
    /// Resolve the raw shape into the canonical client session
    ///
    /// `id` wins over `session_id` and `updated_at` over `last_message_at`
    /// when both are present. Returns `None` when no identifier can be
    /// resolved; the caller drops such sessions with a warning rather than
    /// crashing the listing.
    pub fn normalize(self) -> Option<ChatSession> {
        let session_id = self.id.or(self.session_id)?;
        let last_activity_raw = self.updated_at.or(self.last_message_at);

        Some(ChatSession {
            session_id,
            session_name: self.session_name.filter(|name| !name.trim().is_empty()),
            created_at: parse_timestamp(self.created_at.as_deref()),
            last_activity_at: parse_timestamp(last_activity_raw.as_deref()),
            message_count: self.message_count.unwrap_or(0),
        })
    }
}

/// Response body of `POST /chats`
#[derive(Debug, Deserialize)]
pub(crate) struct CreateSessionResponse {
    pub session_id: i64,
    #[serde(default)]
    pub session_name: Option<String>,
}

/// Raw body of `GET /chats/{id}`
#[derive(Debug, Deserialize)]
pub(crate) struct HistoryResponse {
    #[serde(default)]
    pub messages: Vec<HistoryMessage>,
}

/// One persisted turn from the history endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryMessage {
    #[serde(default)]
    pub session_id: Option<i64>,
    /// The user's message text
    #[serde(default)]
    pub message: String,
    /// The advisor's answer, when one was recorded
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub response_time_ms: Option<u64>,
}

/// Raw body of `DELETE /chats/{id}`
#[derive(Debug, Deserialize)]
pub(crate) struct DeleteSessionResponse {
    #[serde(default)]
    pub status: String,
}

/// Parse a backend timestamp, tolerating the formats seen in the wild
///
/// Accepts RFC 3339 as well as naive ISO timestamps (with or without a `T`
/// separator), which are treated as UTC. Anything unparseable resolves to
/// `None` rather than failing the surrounding response.
pub(crate) fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    tracing::debug!("Unparseable backend timestamp: {}", raw);
    None
}
