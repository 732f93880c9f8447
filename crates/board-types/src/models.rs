use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Caller identity recovered from a validated token.
///
/// Trusted as-is by downstream writes; it is never re-checked against the
/// users table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub name: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    /// Creating user's id, stored as text.
    pub owner_id: String,
}

/// A thread together with its live comment count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadSummary {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub owner_id: String,
    pub comment_count: u64,
}

/// A comment joined with its author's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentView {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub thread_id: i64,
    pub message: String,
    pub created_at: String,
}
