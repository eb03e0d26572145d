//! HTTP implementation of the advisor gateway
//!
//! Wraps the six backend endpoints with reqwest. The base URL and request
//! timeout come from the configuration object passed at construction;
//! nothing here reads global state.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::Config;
use crate::error::{GatewayError, GatewayResult, MaternaError, Result};
use crate::gateway::types::{
    ChatTurnReply, ChatTurnRequest, CreateSessionResponse, DeleteSessionResponse, HealthResponse,
    HealthStatus, HistoryMessage, HistoryResponse, KnowledgeBaseStats, SessionsResponse,
    StatsResponse,
};
use crate::gateway::AdvisorGateway;
use crate::sync::sessions::ChatSession;

/// Advisor backend client over plain JSON HTTP
///
/// # Examples
///
/// ```no_run
/// use materna::config::Config;
/// use materna::gateway::{AdvisorGateway, HttpGateway};
///
/// # async fn example() -> materna::error::Result<()> {
/// let config = Config::default();
/// let gateway = HttpGateway::new(&config)?;
/// let sessions = gateway.list_sessions().await?;
/// # Ok(())
/// # }
/// ```
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// Create a gateway bound to the configured backend
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client initialization fails
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.backend.timeout_seconds))
            .user_agent(concat!("materna/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                MaternaError::Config(format!("Failed to create HTTP client: {}", e))
            })?;

        let base_url = config.backend.base_url.trim_end_matches('/').to_string();

        tracing::info!(
            "Initialized advisor gateway: base_url={}, timeout={}s",
            base_url,
            config.backend.timeout_seconds
        );

        Ok(Self { client, base_url })
    }

    /// The backend base URL this gateway talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Check the HTTP status and decode a success body
    ///
    /// Non-2xx responses become application errors carrying the body text;
    /// a 2xx body that fails to decode is also an application error, since
    /// a response was received but cannot be honored.
    async fn read_success_body<T: DeserializeOwned>(response: Response) -> GatewayResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Backend returned error {}: {}", status, body);
            return Err(application_error(status, body));
        }

        response.json::<T>().await.map_err(|e| {
            tracing::error!("Failed to parse backend response: {}", e);
            GatewayError::Application {
                status: status.as_u16(),
                message: format!("failed to parse response body: {}", e),
            }
        })
    }
}

fn application_error(status: StatusCode, body: String) -> GatewayError {
    let message = if body.trim().is_empty() {
        format!("backend returned HTTP {}", status)
    } else {
        body
    };
    GatewayError::Application {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl AdvisorGateway for HttpGateway {
    async fn health(&self) -> GatewayResult<HealthStatus> {
        let url = self.endpoint("/health");
        tracing::debug!("Checking backend health: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(GatewayError::network)?;

        // An unhealthy backend still answers; only transport failures are
        // errors here. The body is consulted on any status for detail.
        let http_ok = response.status().is_success();
        let status = response.status();
        let body: Option<HealthResponse> = response.json().await.ok();

        let healthy = http_ok
            && body
                .as_ref()
                .map(|b| b.status == "healthy")
                .unwrap_or(false);

        let detail = match (healthy, body) {
            (true, _) => None,
            (false, Some(b)) => {
                let fallback = format!("backend reported status '{}'", b.status);
                Some(b.error.unwrap_or(fallback))
            }
            (false, None) => Some(format!("backend returned HTTP {}", status)),
        };

        Ok(HealthStatus { healthy, detail })
    }

    async fn stats(&self) -> GatewayResult<KnowledgeBaseStats> {
        let url = self.endpoint("/stats");
        tracing::debug!("Fetching backend stats: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(GatewayError::network)?;

        let stats: StatsResponse = Self::read_success_body(response).await?;
        Ok(stats.knowledge_base_stats)
    }

    async fn send_chat(&self, request: &ChatTurnRequest) -> GatewayResult<ChatTurnReply> {
        let url = self.endpoint("/chat");
        tracing::debug!(
            "Sending chat request: session_id={:?}, {} chars",
            request.session_id,
            request.message.len()
        );

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(GatewayError::network)?;

        let http_status = response.status();
        let reply: ChatTurnReply = Self::read_success_body(response).await?;

        if reply.status != "success" {
            tracing::error!("Backend reported chat failure: {}", reply.status);
            let message = if reply.response.trim().is_empty() {
                format!("backend reported status '{}'", reply.status)
            } else {
                reply.response
            };
            return Err(GatewayError::Application {
                status: http_status.as_u16(),
                message,
            });
        }

        tracing::debug!(
            "Chat reply received in {:.2}s",
            reply.processing_time_seconds
        );
        Ok(reply)
    }

    async fn list_sessions(&self) -> GatewayResult<Vec<ChatSession>> {
        let url = self.endpoint("/chats");
        tracing::debug!("Listing sessions: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(GatewayError::network)?;

        let body: SessionsResponse = Self::read_success_body(response).await?;

        let mut sessions = Vec::with_capacity(body.sessions.len());
        for raw in body.sessions {
            match raw.normalize() {
                Some(session) => sessions.push(session),
                None => {
                    tracing::warn!("Dropping session without a resolvable identifier");
                }
            }
        }

        tracing::debug!("Fetched {} sessions", sessions.len());
        Ok(sessions)
    }

    async fn create_session(&self, session_name: Option<&str>) -> GatewayResult<ChatSession> {
        let url = self.endpoint("/chats");
        tracing::debug!("Creating session: {}", url);

        let mut payload = serde_json::Map::new();
        if let Some(name) = session_name {
            payload.insert(
                "session_name".to_string(),
                serde_json::Value::String(name.to_string()),
            );
        }

        let response = self
            .client
            .post(&url)
            .json(&payload)
            .send()
            .await
            .map_err(GatewayError::network)?;

        let created: CreateSessionResponse = Self::read_success_body(response).await?;
        tracing::info!("Created session {}", created.session_id);

        // The create endpoint returns only the identifier and name; the
        // recency timestamp stays empty until the first round-trip
        // refreshes it from the backend.
        Ok(ChatSession {
            session_id: created.session_id,
            session_name: created.session_name.filter(|n| !n.trim().is_empty()),
            created_at: Some(Utc::now()),
            last_activity_at: None,
            message_count: 0,
        })
    }

    async fn fetch_history(&self, session_id: i64) -> GatewayResult<Vec<HistoryMessage>> {
        let url = self.endpoint(&format!("/chats/{}", session_id));
        tracing::debug!("Fetching history for session {}", session_id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(GatewayError::network)?;

        let body: HistoryResponse = Self::read_success_body(response).await?;
        tracing::debug!(
            "Fetched {} messages for session {}",
            body.messages.len(),
            session_id
        );
        Ok(body.messages)
    }

    async fn delete_session(&self, session_id: i64) -> GatewayResult<()> {
        let url = self.endpoint(&format!("/chats/{}", session_id));
        tracing::debug!("Deleting session {}", session_id);

        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(GatewayError::network)?;

        let http_status = response.status();
        let body: DeleteSessionResponse = Self::read_success_body(response).await?;

        if !body.status.is_empty() && body.status != "success" {
            return Err(GatewayError::Application {
                status: http_status.as_u16(),
                message: format!("backend reported status '{}'", body.status),
            });
        }

        tracing::info!("Deleted session {}", session_id);
        Ok(())
    }
}
