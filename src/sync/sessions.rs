//! Chat session model and the session store
//!
//! The session store is the single owner of the session list and the
//! active-session pointer. It holds pure state: every network interaction
//! that feeds it goes through the sync engine, so render code can read the
//! store at any time without observing a half-applied mutation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted conversation thread with a backend-assigned identifier
///
/// Timestamps are parsed at the gateway boundary; a session fresh from the
/// create endpoint has no recency timestamp yet ("No messages yet").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Backend-assigned identifier, never client-generated
    pub session_id: i64,
    /// Display label; may be absent or empty
    pub session_name: Option<String>,
    /// When the session was created
    pub created_at: Option<DateTime<Utc>>,
    /// Recency timestamp driving the sidebar buckets
    pub last_activity_at: Option<DateTime<Utc>>,
    /// Authoritative message count maintained by the backend
    pub message_count: u64,
}

impl ChatSession {
    /// Display label for the session, falling back to `"Chat {id}"`
    ///
    /// # Examples
    ///
    /// ```
    /// use materna::sync::sessions::ChatSession;
    ///
    /// let session = ChatSession {
    ///     session_id: 7,
    ///     session_name: None,
    ///     created_at: None,
    ///     last_activity_at: None,
    ///     message_count: 0,
    /// };
    /// assert_eq!(session.display_name(), "Chat 7");
    /// ```
    pub fn display_name(&self) -> String {
        match &self.session_name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => format!("Chat {}", self.session_id),
        }
    }
}

/// Single-writer store for the session list and active-session pointer
///
/// Sessions are kept newest-first: refreshes take the backend's ordering
/// as-is, and locally created sessions are prepended.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Vec<ChatSession>,
    active_id: Option<i64>,
}

impl SessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// All known sessions, newest first
    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    /// Identifier of the active session, if any
    pub fn active_id(&self) -> Option<i64> {
        self.active_id
    }

    /// The active session record, if one is selected and known
    pub fn active_session(&self) -> Option<&ChatSession> {
        self.active_id.and_then(|id| self.get(id))
    }

    /// Look up a session by identifier
    pub fn get(&self, session_id: i64) -> Option<&ChatSession> {
        self.sessions.iter().find(|s| s.session_id == session_id)
    }

    /// Number of known sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns true when no sessions are known
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Replace the entire session list with a fresh backend snapshot
    ///
    /// The active pointer is left untouched; the backend snapshot is
    /// authoritative for list contents but selection is local state.
    pub fn replace_all(&mut self, sessions: Vec<ChatSession>) {
        tracing::debug!("Replacing session list with {} sessions", sessions.len());
        self.sessions = sessions;
    }

    /// Prepend a newly created session (new sessions sort newest-first)
    pub fn prepend(&mut self, session: ChatSession) {
        self.sessions.insert(0, session);
    }

    /// Remove a session from the list
    ///
    /// Returns true when the session was present. The active pointer is not
    /// touched here; the engine clears it when the removed session was
    /// active.
    pub fn remove(&mut self, session_id: i64) -> bool {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.session_id != session_id);
        self.sessions.len() != before
    }

    /// Set the active session
    ///
    /// Only positive identifiers are selectable; anything else is rejected
    /// as a logged no-op and the previous selection is kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use materna::sync::sessions::SessionStore;
    ///
    /// let mut store = SessionStore::new();
    /// assert!(store.set_active(3));
    /// assert!(!store.set_active(0));
    /// assert_eq!(store.active_id(), Some(3));
    /// ```
    pub fn set_active(&mut self, session_id: i64) -> bool {
        if session_id <= 0 {
            tracing::warn!("Rejecting invalid session id for selection: {}", session_id);
            return false;
        }
        self.active_id = Some(session_id);
        true
    }

    /// Clear the active-session pointer
    pub fn clear_active(&mut self) {
        self.active_id = None;
    }
}
