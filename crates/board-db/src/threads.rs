use rusqlite::{Connection, OptionalExtension, TransactionBehavior};
use tracing::{info, warn};

use crate::capacity::{self, Scope};
use crate::models::{DeletedThread, ThreadRow, ThreadSummaryRow};
use crate::{Database, Result};

impl Database {
    /// Insert a thread if the board is below its thread ceiling.
    ///
    /// The count and the insert share one IMMEDIATE transaction, so two
    /// writers cannot both squeeze in under the ceiling.
    pub fn insert_thread(&self, name: &str, owner_id: &str, created_at: &str) -> Result<i64> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            capacity::admit(&tx, Scope::Threads)?;

            tx.execute(
                "INSERT INTO threads (name, created_at, owner_id) VALUES (?1, ?2, ?3)",
                (name, created_at, owner_id),
            )?;
            let id = tx.last_insert_rowid();
            tx.commit()?;
            Ok(id)
        })
    }

    pub fn get_thread(&self, id: i64) -> Result<Option<ThreadRow>> {
        self.with_conn(|conn| query_thread(conn, id))
    }

    /// One page of threads with their comment counts, oldest first.
    pub fn list_threads(&self, offset: u64, limit: u32) -> Result<Vec<ThreadSummaryRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT t.id, t.name, t.created_at, t.owner_id, COUNT(c.id)
                 FROM threads t
                 LEFT JOIN comments c ON c.thread_id = t.id
                 GROUP BY t.id
                 ORDER BY t.created_at ASC, t.id ASC
                 LIMIT ?1 OFFSET ?2",
            )?;

            let offset = i64::try_from(offset).unwrap_or(i64::MAX);
            let rows = stmt
                .query_map(rusqlite::params![limit, offset], |row| {
                    let count: i64 = row.get(4)?;
                    Ok(ThreadSummaryRow {
                        thread: map_thread(row)?,
                        comment_count: u64::try_from(count).unwrap_or_default(),
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Delete a thread and every comment under it as one unit.
    ///
    /// Comments go first, then the thread row. Any failure rolls both back.
    pub fn delete_thread(&self, id: i64) -> Result<DeletedThread> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            match delete_cascade(&tx, id) {
                Ok(deleted) => {
                    tx.commit()?;
                    info!(
                        "Deleted thread {} ({} comments, thread row removed: {})",
                        id, deleted.comments, deleted.thread
                    );
                    Ok(deleted)
                }
                Err(e) => {
                    if let Err(rollback) = tx.rollback() {
                        warn!("Rollback of thread {} delete failed: {}", id, rollback);
                    }
                    Err(e)
                }
            }
        })
    }
}

fn delete_cascade(conn: &Connection, id: i64) -> Result<DeletedThread> {
    let comments = conn.execute("DELETE FROM comments WHERE thread_id = ?1", [id])?;
    let threads = conn.execute("DELETE FROM threads WHERE id = ?1", [id])?;
    Ok(DeletedThread {
        thread: threads > 0,
        comments: comments as u64,
    })
}

pub(crate) fn query_thread(conn: &Connection, id: i64) -> Result<Option<ThreadRow>> {
    let row = conn
        .query_row(
            "SELECT id, name, created_at, owner_id FROM threads WHERE id = ?1",
            [id],
            map_thread,
        )
        .optional()?;
    Ok(row)
}

fn map_thread(row: &rusqlite::Row<'_>) -> rusqlite::Result<ThreadRow> {
    Ok(ThreadRow {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
        owner_id: row.get(3)?,
    })
}
