use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use tracing::info;

use board_db::models::CommentRow;
use board_db::{Database, timestamp};
use board_types::api::{CommentListQuery, CommentListResponse, CreateCommentRequest, CreatedResponse};
use board_types::limits::MAX_COMMENTS_PER_THREAD;
use board_types::models::{CommentView, Identity};

use crate::error::ApiError;
use crate::state::{AppState, run_blocking};

// -- Lifecycle --

/// Post a comment by `author` under `thread_id`, subject to the thread's
/// comment ceiling.
pub fn create(
    db: &Database,
    author: &Identity,
    thread_id: i64,
    message: &str,
    now: DateTime<Utc>,
) -> Result<i64, ApiError> {
    if message.trim().is_empty() {
        return Err(ApiError::Validation("Message must not be empty".into()));
    }

    let id = db.insert_comment(author.user_id, thread_id, message, &timestamp(now))?;
    info!("{} ({}) commented on thread {}", author.name, author.user_id, thread_id);
    Ok(id)
}

/// The full comment history of a thread, newest first.
pub fn list(db: &Database, thread_id: i64) -> Result<CommentListResponse, ApiError> {
    let history = db.list_comments(thread_id)?;
    let comment_count = history.total;
    let comments = history.comments.into_iter().map(view_from_row).collect();

    Ok(CommentListResponse {
        comments,
        is_limit_reached: comment_count >= MAX_COMMENTS_PER_THREAD,
        max_comments: MAX_COMMENTS_PER_THREAD,
        comment_count,
    })
}

fn view_from_row(row: CommentRow) -> CommentView {
    CommentView {
        id: row.id,
        user_id: row.user_id,
        name: row.author_name,
        thread_id: row.thread_id,
        message: row.message,
        created_at: row.created_at,
    }
}

// -- Handlers --

pub async fn create_comment(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    WithRejection(Json(req), _): WithRejection<Json<CreateCommentRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let id = run_blocking(&state, move |state| {
        create(&state.db, &identity, req.thread_id, &req.message, Utc::now())
    })
    .await?;

    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

pub async fn list_comments(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<CommentListQuery>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let response = run_blocking(&state, move |state| list(&state.db, query.thread_id)).await?;
    Ok(Json(response))
}
