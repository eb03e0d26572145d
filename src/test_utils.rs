//! Shared test doubles for unit tests
//!
//! `FakeGateway` implements the gateway trait over queued canned
//! responses so engine behavior can be exercised without a server.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::{GatewayError, GatewayResult};
use crate::gateway::{
    AdvisorGateway, ChatTurnReply, ChatTurnRequest, HealthStatus, HistoryMessage,
    KnowledgeBaseStats,
};
use crate::sync::sessions::ChatSession;

/// A minimal session record for tests
pub fn fake_session(session_id: i64) -> ChatSession {
    ChatSession {
        session_id,
        session_name: None,
        created_at: Some(Utc::now()),
        last_activity_at: None,
        message_count: 0,
    }
}

/// In-process gateway double driven by queued responses
///
/// Queues are popped per call; an empty queue yields a benign default so
/// tests only configure the calls they care about.
#[derive(Default)]
pub struct FakeGateway {
    sessions: Mutex<Vec<ChatSession>>,
    chat_replies: Mutex<VecDeque<GatewayResult<ChatTurnReply>>>,
    create_replies: Mutex<VecDeque<GatewayResult<ChatSession>>>,
    history_replies: Mutex<VecDeque<GatewayResult<Vec<HistoryMessage>>>>,
    delete_replies: Mutex<VecDeque<GatewayResult<()>>>,
    list_failures: Mutex<VecDeque<GatewayError>>,
    list_count: AtomicUsize,
    chat_count: AtomicUsize,
    history_count: AtomicUsize,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sessions returned by `list_sessions` when no failure is queued
    pub fn set_sessions(&self, sessions: Vec<ChatSession>) {
        *self.sessions.lock().unwrap() = sessions;
    }

    pub fn queue_chat(&self, reply: GatewayResult<ChatTurnReply>) {
        self.chat_replies.lock().unwrap().push_back(reply);
    }

    pub fn queue_create(&self, reply: GatewayResult<ChatSession>) {
        self.create_replies.lock().unwrap().push_back(reply);
    }

    pub fn queue_history(&self, reply: GatewayResult<Vec<HistoryMessage>>) {
        self.history_replies.lock().unwrap().push_back(reply);
    }

    pub fn queue_delete(&self, reply: GatewayResult<()>) {
        self.delete_replies.lock().unwrap().push_back(reply);
    }

    pub fn queue_list_failure(&self, err: GatewayError) {
        self.list_failures.lock().unwrap().push_back(err);
    }

    pub fn list_calls(&self) -> usize {
        self.list_count.load(Ordering::SeqCst)
    }

    pub fn chat_calls(&self) -> usize {
        self.chat_count.load(Ordering::SeqCst)
    }

    pub fn history_calls(&self) -> usize {
        self.history_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AdvisorGateway for FakeGateway {
    async fn health(&self) -> GatewayResult<HealthStatus> {
        Ok(HealthStatus {
            healthy: true,
            detail: None,
        })
    }

    async fn stats(&self) -> GatewayResult<KnowledgeBaseStats> {
        Ok(KnowledgeBaseStats { total_chunks: 0 })
    }

    async fn send_chat(&self, _request: &ChatTurnRequest) -> GatewayResult<ChatTurnReply> {
        self.chat_count.fetch_add(1, Ordering::SeqCst);
        self.chat_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(ChatTurnReply {
                    status: "success".to_string(),
                    response: "canned answer".to_string(),
                    processing_time_seconds: 0.1,
                })
            })
    }

    async fn list_sessions(&self) -> GatewayResult<Vec<ChatSession>> {
        self.list_count.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.list_failures.lock().unwrap().pop_front() {
            return Err(err);
        }
        Ok(self.sessions.lock().unwrap().clone())
    }

    async fn create_session(&self, _session_name: Option<&str>) -> GatewayResult<ChatSession> {
        self.create_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(fake_session(1)))
    }

    async fn fetch_history(&self, _session_id: i64) -> GatewayResult<Vec<HistoryMessage>> {
        self.history_count.fetch_add(1, Ordering::SeqCst);
        self.history_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Vec::new()))
    }

    async fn delete_session(&self, _session_id: i64) -> GatewayResult<()> {
        self.delete_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }
}
