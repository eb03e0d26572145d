//! Recency bucketing for the session list
//!
//! Pure calendar-date partition of sessions into today / yesterday /
//! this-week / older groups for display. Comparison is by calendar date,
//! not elapsed hours: a session touched at 23:59 yesterday is "Yesterday"
//! even one minute later.

use chrono::{DateTime, Duration, Utc};

use crate::sync::sessions::ChatSession;

/// Display bucket for a session's recency timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecencyBucket {
    Today,
    Yesterday,
    ThisWeek,
    Older,
}

impl RecencyBucket {
    /// Header label used when rendering the session list
    pub fn label(&self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Yesterday => "Yesterday",
            Self::ThisWeek => "This Week",
            Self::Older => "Older",
        }
    }
}

impl std::fmt::Display for RecencyBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Bucket for a single recency timestamp
///
/// A session with no resolvable recency timestamp lands in `Older`; the
/// partition is total, so every session has exactly one bucket.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use materna::sync::buckets::{bucket_for, RecencyBucket};
///
/// let now = Utc::now();
/// assert_eq!(bucket_for(now, Some(now)), RecencyBucket::Today);
/// assert_eq!(bucket_for(now, None), RecencyBucket::Older);
/// ```
pub fn bucket_for(now: DateTime<Utc>, last_activity_at: Option<DateTime<Utc>>) -> RecencyBucket {
    let timestamp = match last_activity_at {
        Some(t) => t,
        None => return RecencyBucket::Older,
    };

    let today = now.date_naive();
    let date = timestamp.date_naive();

    if date == today {
        RecencyBucket::Today
    } else if date == today - Duration::days(1) {
        RecencyBucket::Yesterday
    } else if date >= today - Duration::days(7) {
        RecencyBucket::ThisWeek
    } else {
        RecencyBucket::Older
    }
}

/// Sessions partitioned by recency, in display order
#[derive(Debug, Default)]
pub struct SessionBuckets<'a> {
    pub today: Vec<&'a ChatSession>,
    pub yesterday: Vec<&'a ChatSession>,
    pub this_week: Vec<&'a ChatSession>,
    pub older: Vec<&'a ChatSession>,
}

impl<'a> SessionBuckets<'a> {
    /// Buckets paired with their labels, in display order
    pub fn sections(&self) -> [(RecencyBucket, &[&'a ChatSession]); 4] {
        [
            (RecencyBucket::Today, self.today.as_slice()),
            (RecencyBucket::Yesterday, self.yesterday.as_slice()),
            (RecencyBucket::ThisWeek, self.this_week.as_slice()),
            (RecencyBucket::Older, self.older.as_slice()),
        ]
    }

    /// Total number of sessions across all buckets
    pub fn len(&self) -> usize {
        self.today.len() + self.yesterday.len() + self.this_week.len() + self.older.len()
    }

    /// Returns true when no sessions were bucketed
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partition sessions into recency buckets
///
/// Relative order within each bucket follows the input order; no
/// re-sorting happens here.
pub fn group_by_recency(now: DateTime<Utc>, sessions: &[ChatSession]) -> SessionBuckets<'_> {
    let mut buckets = SessionBuckets::default();
    for session in sessions {
        match bucket_for(now, session.last_activity_at) {
            RecencyBucket::Today => buckets.today.push(session),
            RecencyBucket::Yesterday => buckets.yesterday.push(session),
            RecencyBucket::ThisWeek => buckets.this_week.push(session),
            RecencyBucket::Older => buckets.older.push(session),
        }
    }
    buckets
}
