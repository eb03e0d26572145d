//! Sync engine coordinating the stores and the gateway
//!
//! The engine owns one gateway plus the session store and message
//! timeline, and implements the operation flows: optimistic local mutation
//! first, network call second, reconciliation or in-place failure third.
//! Each store stays single-writer because every mutation funnels through
//! here.

use std::sync::Arc;

use crate::config::ChatConfig;
use crate::error::{GatewayResult, MaternaError, Result};
use crate::gateway::{AdvisorGateway, ChatTurnRequest, HealthStatus, KnowledgeBaseStats};
use crate::sync::sessions::SessionStore;
use crate::sync::timeline::{MessageTimeline, RestoredTurn};

/// Client-side synchronization engine for the advisor backend
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use materna::config::Config;
/// use materna::gateway::HttpGateway;
/// use materna::sync::engine::SyncEngine;
///
/// # async fn example() -> materna::error::Result<()> {
/// let config = Config::default();
/// let gateway = Arc::new(HttpGateway::new(&config)?);
/// let mut engine = SyncEngine::new(gateway, config.chat.clone());
/// engine.refresh_sessions().await?;
/// let turn_id = engine.send_message("What foods should I avoid?").await?;
/// # Ok(())
/// # }
/// ```
pub struct SyncEngine {
    gateway: Arc<dyn AdvisorGateway>,
    store: SessionStore,
    timeline: MessageTimeline,
    chat: ChatConfig,
}

impl SyncEngine {
    /// Create an engine over the given gateway
    pub fn new(gateway: Arc<dyn AdvisorGateway>, chat: ChatConfig) -> Self {
        Self {
            gateway,
            store: SessionStore::new(),
            timeline: MessageTimeline::new(),
            chat,
        }
    }

    /// Read access to the session store
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Read access to the message timeline
    pub fn timeline(&self) -> &MessageTimeline {
        &self.timeline
    }

    #[cfg(test)]
    pub(crate) fn timeline_mut(&mut self) -> &mut MessageTimeline {
        &mut self.timeline
    }

    /// Backend liveness check (pass-through; callers retry manually)
    pub async fn health(&self) -> GatewayResult<HealthStatus> {
        self.gateway.health().await
    }

    /// Knowledge base counters (pass-through)
    pub async fn stats(&self) -> GatewayResult<KnowledgeBaseStats> {
        self.gateway.stats().await
    }

    /// Replace the session list with a fresh backend snapshot
    ///
    /// Runs on startup and after every successful message round-trip so
    /// message counts and recency stay authoritative. On failure the
    /// previous list is kept and the error propagates for the caller's
    /// manual-retry affordance.
    pub async fn refresh_sessions(&mut self) -> Result<()> {
        let sessions = self
            .gateway
            .list_sessions()
            .await
            .map_err(MaternaError::from)?;
        self.store.replace_all(sessions);
        Ok(())
    }

    /// Create a session and make it active
    ///
    /// Sessions are never created optimistically: the backend must assign
    /// the identifier before any message can reference it. On failure the
    /// store is left unchanged.
    pub async fn create_session(&mut self) -> Result<i64> {
        let session = self
            .gateway
            .create_session(None)
            .await
            .map_err(MaternaError::from)?;
        let session_id = session.session_id;

        self.store.prepend(session);
        self.store.set_active(session_id);
        self.timeline.clear();

        Ok(session_id)
    }

    /// Select a session and load its history
    ///
    /// Non-positive identifiers are a logged no-op; the previous selection
    /// and timeline are kept.
    pub async fn select_session(&mut self, session_id: i64) -> Result<()> {
        if !self.store.set_active(session_id) {
            return Ok(());
        }
        self.load_history(session_id).await
    }

    /// Clear the selection and empty the timeline without a network call
    pub fn clear_selection(&mut self) {
        self.store.clear_active();
        self.timeline.clear();
    }

    /// Delete a session
    ///
    /// On success the session leaves the list; deleting the active session
    /// also clears the selection and timeline. On failure nothing changes
    /// locally and the error propagates.
    pub async fn delete_session(&mut self, session_id: i64) -> Result<()> {
        self.gateway
            .delete_session(session_id)
            .await
            .map_err(MaternaError::from)?;

        self.store.remove(session_id);
        if self.store.active_id() == Some(session_id) {
            self.store.clear_active();
            self.timeline.clear();
        }

        Ok(())
    }

    /// Replace the timeline with a session's persisted history
    ///
    /// The load is ticketed: if the selection changes while the fetch is in
    /// flight, the late result is discarded instead of overwriting the
    /// now-current timeline. On failure the timeline is left empty and the
    /// error propagates.
    pub async fn load_history(&mut self, session_id: i64) -> Result<()> {
        let ticket = self.timeline.begin_load(session_id);

        match self.gateway.fetch_history(session_id).await {
            Ok(messages) => {
                let restored: Vec<RestoredTurn> = messages
                    .into_iter()
                    .map(|m| RestoredTurn {
                        session_id: m.session_id.unwrap_or(session_id),
                        user_text: m.message,
                        assistant_text: m.response,
                        response_latency_ms: m.response_time_ms,
                    })
                    .collect();

                self.timeline
                    .commit_load(&ticket, self.store.active_id(), restored);
                Ok(())
            }
            Err(err) => {
                self.timeline.fail_load(&ticket);
                Err(MaternaError::from(err).into())
            }
        }
    }

    /// Send a message with an optimistic timeline insert
    ///
    /// Exactly one turn is produced per call. With no active session, one
    /// is created first (the send aborts with no turn if that fails). The
    /// pending turn is then completed or failed in place; a send failure is
    /// reported through the turn's state, not as an error. After a
    /// successful round-trip the session list is refreshed; a refresh
    /// failure keeps the stale list and only logs.
    ///
    /// Returns the turn identifier for display lookups.
    pub async fn send_message(&mut self, text: &str) -> Result<u64> {
        let text = text.trim();
        if text.is_empty() {
            return Err(MaternaError::Timeline("cannot send an empty message".to_string()).into());
        }
        if self.timeline.is_loading() {
            return Err(
                MaternaError::Timeline("history load still in flight".to_string()).into(),
            );
        }

        // Request ordering: the session must exist before the message call.
        let session_id = match self.store.active_id() {
            Some(id) => id,
            None => self.create_session().await?,
        };

        let turn_id = self.timeline.push_pending(session_id, text);

        let request = ChatTurnRequest {
            message: text.to_string(),
            session_id: Some(session_id),
            top_k: Some(self.chat.top_k),
            similarity_threshold: Some(self.chat.similarity_threshold),
        };

        let send_result = self.gateway.send_chat(&request).await;
        match send_result {
            Ok(reply) => {
                let latency_ms = reply.latency_ms();
                self.timeline.complete_turn(turn_id, reply.response, latency_ms);

                if let Err(err) = self.refresh_sessions().await {
                    tracing::warn!("Session list refresh after send failed: {}", err);
                }
            }
            Err(err) => {
                tracing::error!("Chat request failed: {}", err);
                self.timeline.fail_turn(turn_id);
            }
        }

        Ok(turn_id)
    }
}
