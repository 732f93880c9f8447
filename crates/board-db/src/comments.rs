use rusqlite::TransactionBehavior;

use crate::capacity::{self, Scope};
use crate::models::{CommentHistory, CommentRow};
use crate::threads::query_thread;
use crate::{Database, Result, StoreError};

impl Database {
    /// Insert a comment under an existing thread that is below its comment
    /// ceiling. Existence, count and insert share one IMMEDIATE transaction.
    pub fn insert_comment(
        &self,
        user_id: i64,
        thread_id: i64,
        message: &str,
        created_at: &str,
    ) -> Result<i64> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            if query_thread(&tx, thread_id)?.is_none() {
                return Err(StoreError::ThreadNotFound(thread_id));
            }
            capacity::admit(&tx, Scope::Comments { thread_id })?;

            tx.execute(
                "INSERT INTO comments (user_id, thread_id, message, created_at) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![user_id, thread_id, message, created_at],
            )?;
            let id = tx.last_insert_rowid();
            tx.commit()?;
            Ok(id)
        })
    }

    /// Every comment in a thread, newest first. Equal timestamps keep
    /// insertion order. `total` always equals `comments.len()`.
    pub fn list_comments(&self, thread_id: i64) -> Result<CommentHistory> {
        self.with_conn(|conn| {
            // JOIN users to fetch the author name in a single query
            let mut stmt = conn.prepare(
                "SELECT c.id, c.user_id, u.name, c.thread_id, c.message, c.created_at
                 FROM comments c
                 LEFT JOIN users u ON c.user_id = u.id
                 WHERE c.thread_id = ?1
                 ORDER BY c.created_at DESC, c.id ASC",
            )?;

            let rows = stmt
                .query_map([thread_id], |row| {
                    Ok(CommentRow {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        author_name: row
                            .get::<_, Option<String>>(2)?
                            .unwrap_or_else(|| "unknown".to_string()),
                        thread_id: row.get(3)?,
                        message: row.get(4)?,
                        created_at: row.get(5)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            let total = capacity::count(conn, Scope::Comments { thread_id })?;

            Ok(CommentHistory { comments: rows, total })
        })
    }
}
