//! Client-side state synchronized with the advisor backend
//!
//! This module holds the two single-writer stores (session list and
//! message timeline), the engine that drives them through the gateway, and
//! the pure recency-bucketing function used to render the session list.

pub mod buckets;
pub mod engine;
pub mod sessions;
pub mod timeline;

pub use buckets::{bucket_for, group_by_recency, RecencyBucket, SessionBuckets};
pub use engine::SyncEngine;
pub use sessions::{ChatSession, SessionStore};
pub use timeline::{MessageTimeline, MessageTurn, TurnStatus, SEND_FAILURE_APOLOGY};
