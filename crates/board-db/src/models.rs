//! Database row types — these map directly to SQLite rows.
//! Distinct from board-types API models to keep the DB layer independent.

pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub pw_hash: String,
}

pub struct ThreadRow {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub owner_id: String,
}

pub struct ThreadSummaryRow {
    pub thread: ThreadRow,
    pub comment_count: u64,
}

pub struct CommentRow {
    pub id: i64,
    pub user_id: i64,
    pub author_name: String,
    pub thread_id: i64,
    pub message: String,
    pub created_at: String,
}

/// A thread's comments plus the row count read under the same lock.
pub struct CommentHistory {
    pub comments: Vec<CommentRow>,
    pub total: u64,
}

/// What a cascading delete removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletedThread {
    pub thread: bool,
    pub comments: u64,
}
