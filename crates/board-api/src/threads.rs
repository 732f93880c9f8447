use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use board_db::models::{ThreadRow, ThreadSummaryRow};
use board_db::{Database, Scope, timestamp};
use board_types::api::{
    CreateThreadRequest, CreatedResponse, DeleteThreadResponse, ThreadListQuery, ThreadListResponse,
};
use board_types::limits::{MAX_THREADS, THREADS_PER_PAGE};
use board_types::models::{Identity, Thread, ThreadSummary};
use board_types::pagination;

use crate::error::ApiError;
use crate::state::{AppState, run_blocking};

// -- Lifecycle --

/// Open a new thread owned by `owner`, subject to the board's thread ceiling.
pub fn create(db: &Database, owner: &Identity, name: &str, now: DateTime<Utc>) -> Result<i64, ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::Validation("Thread name must not be empty".into()));
    }

    let id = db.insert_thread(name, &owner.user_id.to_string(), &timestamp(now))?;
    info!("{} ({}) opened thread {}", owner.name, owner.user_id, id);
    Ok(id)
}

pub fn get_by_id(db: &Database, id: i64) -> Result<Thread, ApiError> {
    db.get_thread(id)?
        .map(thread_from_row)
        .ok_or_else(|| ApiError::NotFound(format!("Thread {id} not found")))
}

/// One 1-based page of threads. Pages past the end come back empty.
pub fn list(db: &Database, page: u32) -> Result<ThreadListResponse, ApiError> {
    if page == 0 {
        return Err(ApiError::Validation("Invalid page".into()));
    }

    let thread_count = db.count(Scope::Threads)?;
    let window = pagination::window(page, THREADS_PER_PAGE, thread_count);
    let threads = db
        .list_threads(window.offset, window.limit)?
        .into_iter()
        .map(summary_from_row)
        .collect();

    Ok(ThreadListResponse {
        threads,
        is_limit_reached: thread_count >= MAX_THREADS,
        max_threads: MAX_THREADS,
        thread_count,
        page_count: window.page_count,
    })
}

/// Remove a thread and all of its comments atomically.
///
/// No identity is required here; deleting an unknown id succeeds and
/// reports that nothing was removed.
pub fn delete_by_id(db: &Database, id: i64) -> Result<DeleteThreadResponse, ApiError> {
    let deleted = db.delete_thread(id)?;
    Ok(DeleteThreadResponse {
        deleted_thread: deleted.thread,
        deleted_comments: deleted.comments,
    })
}

fn thread_from_row(row: ThreadRow) -> Thread {
    Thread {
        id: row.id,
        name: row.name,
        created_at: row.created_at,
        owner_id: row.owner_id,
    }
}

fn summary_from_row(row: ThreadSummaryRow) -> ThreadSummary {
    ThreadSummary {
        id: row.thread.id,
        name: row.thread.name,
        created_at: row.thread.created_at,
        owner_id: row.thread.owner_id,
        comment_count: row.comment_count,
    }
}

// -- Handlers --

pub async fn create_thread(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    WithRejection(Json(req), _): WithRejection<Json<CreateThreadRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let id = run_blocking(&state, move |state| {
        create(&state.db, &identity, &req.name, Utc::now())
    })
    .await?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

pub async fn list_threads(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<ThreadListQuery>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let page = query.page.unwrap_or(1);
    debug!("Listing threads, page {}", page);

    let response = run_blocking(&state, move |state| list(&state.db, page)).await?;
    Ok(Json(response))
}

pub async fn get_thread(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let thread = run_blocking(&state, move |state| get_by_id(&state.db, id)).await?;
    Ok(Json(thread))
}

pub async fn delete_thread(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let response = run_blocking(&state, move |state| delete_by_id(&state.db, id)).await?;
    Ok(Json(response))
}
