//! Row ceilings checked before every thread or comment insert.

use std::fmt;

use board_types::limits::{MAX_COMMENTS_PER_THREAD, MAX_THREADS};
use rusqlite::Connection;
use tracing::warn;

use crate::{Database, Result, StoreError};

/// What a ceiling is counted over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Every thread on the board.
    Threads,
    /// Comments under one thread.
    Comments { thread_id: i64 },
}

impl Scope {
    pub fn ceiling(self) -> u64 {
        match self {
            Scope::Threads => MAX_THREADS,
            Scope::Comments { .. } => MAX_COMMENTS_PER_THREAD,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Threads => write!(f, "thread"),
            Scope::Comments { thread_id } => write!(f, "comment (thread {thread_id})"),
        }
    }
}

/// Current number of rows in `scope`. A scope with no rows counts as zero.
pub fn count(conn: &Connection, scope: Scope) -> Result<u64> {
    let n: i64 = match scope {
        Scope::Threads => conn.query_row("SELECT COUNT(*) FROM threads", [], |row| row.get(0))?,
        Scope::Comments { thread_id } => conn.query_row(
            "SELECT COUNT(*) FROM comments WHERE thread_id = ?1",
            [thread_id],
            |row| row.get(0),
        )?,
    };
    Ok(u64::try_from(n).unwrap_or_default())
}

/// Admit one more row into `scope`, or fail with `CapacityExceeded`.
///
/// Callers that go on to insert run this on the same transaction as the
/// insert so the count cannot go stale in between.
pub fn admit(conn: &Connection, scope: Scope) -> Result<()> {
    let current = count(conn, scope)?;
    let ceiling = scope.ceiling();
    if current >= ceiling {
        warn!("Rejected insert: {} ceiling of {} reached", scope, ceiling);
        return Err(StoreError::CapacityExceeded { scope, ceiling });
    }
    Ok(())
}

impl Database {
    pub fn count(&self, scope: Scope) -> Result<u64> {
        self.with_conn(|conn| count(conn, scope))
    }
}
