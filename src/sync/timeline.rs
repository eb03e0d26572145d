//! Message timeline with optimistic sends and guarded history loads
//!
//! The timeline owns the turn list for whichever session is currently
//! active. A send appends a `Pending` turn immediately and the same turn is
//! later completed or failed in place; a turn is never dropped, duplicated,
//! or rolled back. History loads are generation-guarded so a late-arriving
//! response for a previously selected session cannot overwrite the current
//! timeline.

use tracing::warn;

/// Fixed user-facing text placed on a turn when the send fails
pub const SEND_FAILURE_APOLOGY: &str = "Sorry, I encountered an error. Please try again.";

/// Lifecycle state of a message turn
///
/// A turn transitions `Pending -> Complete` or `Pending -> Failed` exactly
/// once; there is no path back to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStatus {
    /// Sent, awaiting the backend's answer
    Pending,
    /// Answer received and recorded
    Complete,
    /// Send failed; the turn carries the apology text
    Failed,
}

impl std::fmt::Display for TurnStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Complete => write!(f, "complete"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// One user message plus its (eventual) assistant response
///
/// `turn_id` is a client-local token used only for reconciliation; it is
/// minted from a monotonic counter and never reused, so it cannot collide
/// with anything backend-issued.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageTurn {
    /// Client-local identifier for reconciliation
    pub turn_id: u64,
    /// Session this turn belongs to
    pub session_id: i64,
    /// The text the user submitted; immutable once created
    pub user_text: String,
    /// Backend answer, or the apology text on a failed send
    pub assistant_text: Option<String>,
    /// Backend-reported processing time in milliseconds
    pub response_latency_ms: Option<u64>,
    /// Lifecycle state
    pub status: TurnStatus,
}

/// A settled turn reconstructed from backend history
///
/// History turns arrive already answered; the timeline mints local ids for
/// them on commit.
#[derive(Debug, Clone)]
pub struct RestoredTurn {
    pub session_id: i64,
    pub user_text: String,
    pub assistant_text: Option<String>,
    pub response_latency_ms: Option<u64>,
}

/// Handle identifying one in-flight history load
///
/// Issued by [`MessageTimeline::begin_load`]; a commit with a stale ticket
/// is discarded instead of overwriting the current timeline.
#[derive(Debug, Clone, Copy)]
pub struct LoadTicket {
    session_id: i64,
    generation: u64,
}

impl LoadTicket {
    /// Session this load was started for
    pub fn session_id(&self) -> i64 {
        self.session_id
    }
}

/// Single-writer store for the active session's turns
#[derive(Debug, Default)]
pub struct MessageTimeline {
    turns: Vec<MessageTurn>,
    loading: bool,
    generation: u64,
    next_turn_id: u64,
}

impl MessageTimeline {
    /// Create an empty timeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns in local creation order
    pub fn turns(&self) -> &[MessageTurn] {
        &self.turns
    }

    /// Look up a turn by its client-local identifier
    pub fn get_turn(&self, turn_id: u64) -> Option<&MessageTurn> {
        self.turns.iter().find(|t| t.turn_id == turn_id)
    }

    /// True while a history load is in flight
    ///
    /// Sends must be rejected during a load; otherwise an optimistic insert
    /// could race into a timeline that is about to be replaced.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Number of turns
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns true when the timeline has no turns
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Drop all turns and invalidate any in-flight load
    pub fn clear(&mut self) {
        self.turns.clear();
        self.loading = false;
        self.generation += 1;
    }

    /// Start a history load for a session
    ///
    /// Bumps the load generation so any earlier in-flight load becomes
    /// stale, and marks the timeline as loading.
    pub fn begin_load(&mut self, session_id: i64) -> LoadTicket {
        self.generation += 1;
        self.loading = true;
        LoadTicket {
            session_id,
            generation: self.generation,
        }
    }

    /// Commit a finished history load
    ///
    /// Replaces the whole turn list with the restored history, preserved in
    /// the order given (backend order is never re-sorted). The commit is
    /// discarded when the ticket is stale or the session it was started for
    /// is no longer the active one.
    ///
    /// Returns true when the load was committed.
    pub fn commit_load(
        &mut self,
        ticket: &LoadTicket,
        active_id: Option<i64>,
        restored: Vec<RestoredTurn>,
    ) -> bool {
        if ticket.generation != self.generation {
            warn!(
                "Discarding stale history load for session {} (superseded)",
                ticket.session_id
            );
            return false;
        }
        if active_id != Some(ticket.session_id) {
            warn!(
                "Discarding history load for session {}: no longer active",
                ticket.session_id
            );
            self.loading = false;
            return false;
        }

        self.turns = restored
            .into_iter()
            .map(|r| {
                self.next_turn_id += 1;
                MessageTurn {
                    turn_id: self.next_turn_id,
                    session_id: r.session_id,
                    user_text: r.user_text,
                    assistant_text: r.assistant_text,
                    response_latency_ms: r.response_latency_ms,
                    status: TurnStatus::Complete,
                }
            })
            .collect();
        self.loading = false;
        true
    }

    /// Record a failed history load
    ///
    /// Leaves the timeline empty so the failure is visible to the caller.
    /// A stale ticket is ignored; the newer load owns the timeline.
    ///
    /// Returns true when the failure applied to the current load.
    pub fn fail_load(&mut self, ticket: &LoadTicket) -> bool {
        if ticket.generation != self.generation {
            warn!(
                "Ignoring failure of superseded history load for session {}",
                ticket.session_id
            );
            return false;
        }
        self.turns.clear();
        self.loading = false;
        true
    }

    /// Append an optimistic pending turn and return its identifier
    pub fn push_pending(&mut self, session_id: i64, user_text: impl Into<String>) -> u64 {
        self.next_turn_id += 1;
        let turn_id = self.next_turn_id;
        self.turns.push(MessageTurn {
            turn_id,
            session_id,
            user_text: user_text.into(),
            assistant_text: None,
            response_latency_ms: None,
            status: TurnStatus::Pending,
        });
        turn_id
    }

    /// Complete a pending turn in place with the backend's answer
    ///
    /// A turn that is not `Pending` is left untouched: status transitions
    /// are monotonic. Returns true when the turn was updated.
    pub fn complete_turn(
        &mut self,
        turn_id: u64,
        assistant_text: impl Into<String>,
        response_latency_ms: u64,
    ) -> bool {
        match self.turns.iter_mut().find(|t| t.turn_id == turn_id) {
            Some(turn) if turn.status == TurnStatus::Pending => {
                turn.assistant_text = Some(assistant_text.into());
                turn.response_latency_ms = Some(response_latency_ms);
                turn.status = TurnStatus::Complete;
                true
            }
            Some(turn) => {
                warn!(
                    "Refusing to complete turn {} in state {}",
                    turn_id, turn.status
                );
                false
            }
            None => {
                warn!("Cannot complete unknown turn {}", turn_id);
                false
            }
        }
    }

    /// Fail a pending turn in place with the fixed apology text
    ///
    /// `response_latency_ms` stays empty; no latency was measured. Subject
    /// to the same monotonicity rule as [`complete_turn`](Self::complete_turn).
    pub fn fail_turn(&mut self, turn_id: u64) -> bool {
        match self.turns.iter_mut().find(|t| t.turn_id == turn_id) {
            Some(turn) if turn.status == TurnStatus::Pending => {
                turn.assistant_text = Some(SEND_FAILURE_APOLOGY.to_string());
                turn.status = TurnStatus::Failed;
                true
            }
            Some(turn) => {
                warn!("Refusing to fail turn {} in state {}", turn_id, turn.status);
                false
            }
            None => {
                warn!("Cannot fail unknown turn {}", turn_id);
                false
            }
        }
    }
}
