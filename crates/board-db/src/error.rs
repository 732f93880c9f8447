use thiserror::Error;

use crate::capacity::Scope;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("database lock poisoned")]
    Poisoned,

    #[error("user name already taken: {0}")]
    DuplicateName(String),

    #[error("{scope} ceiling of {ceiling} reached")]
    CapacityExceeded { scope: Scope, ceiling: u64 },

    #[error("thread {0} not found")]
    ThreadNotFound(i64),
}
