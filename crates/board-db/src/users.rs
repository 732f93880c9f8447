use rusqlite::{Connection, ErrorCode, OptionalExtension};
use tracing::info;

use crate::models::UserRow;
use crate::{Database, Result, StoreError};

impl Database {
    /// Insert a user and return its id. Names are unique.
    pub fn create_user(&self, name: &str, pw_hash: &str) -> Result<i64> {
        self.with_conn(|conn| {
            if query_user_by_name(conn, name)?.is_some() {
                return Err(StoreError::DuplicateName(name.to_string()));
            }

            // The UNIQUE constraint still catches a writer from another process
            insert_user(conn, name, pw_hash)?;

            let id = conn.last_insert_rowid();
            info!("Registered user {} ({})", name, id);
            Ok(id)
        })
    }

    pub fn get_user_by_name(&self, name: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_name(conn, name))
    }
}

fn insert_user(conn: &Connection, name: &str, pw_hash: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO users (name, pw_hash) VALUES (?1, ?2)",
        (name, pw_hash),
    )
    .map_err(|e| match e {
        rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation => {
            StoreError::DuplicateName(name.to_string())
        }
        other => StoreError::Sqlite(other),
    })?;
    Ok(())
}

fn query_user_by_name(conn: &Connection, name: &str) -> Result<Option<UserRow>> {
    let row = conn
        .query_row(
            "SELECT id, name, pw_hash FROM users WHERE name = ?1",
            [name],
            map_user,
        )
        .optional()?;
    Ok(row)
}

fn map_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        name: row.get(1)?,
        pw_hash: row.get(2)?,
    })
}
