use std::sync::Arc;

use tracing::error;

use board_db::Database;

use crate::auth::AuthGate;
use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub gate: AuthGate,
}

impl AppStateInner {
    pub fn new(db: Database, gate: AuthGate) -> AppState {
        Arc::new(Self { db, gate })
    }
}

/// Run blocking store (and hashing) work off the async runtime.
pub async fn run_blocking<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&AppStateInner) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(state.as_ref()))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal("blocking task failed".into())
        })?
}
