use serde::{Deserialize, Serialize};

use crate::models::{CommentView, ThreadSummary};

// -- Token claims --

/// Signed token payload. `exp` is in unix seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub name: String,
    pub exp: i64,
}

// -- Auth --

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    #[serde(alias = "pw_hash")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub name: String,
    #[serde(alias = "pw_hash")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

// -- Threads --

#[derive(Debug, Deserialize)]
pub struct CreateThreadRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ThreadListQuery {
    pub page: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ThreadListResponse {
    pub threads: Vec<ThreadSummary>,
    pub is_limit_reached: bool,
    pub max_threads: u64,
    pub thread_count: u64,
    pub page_count: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteThreadResponse {
    pub deleted_thread: bool,
    pub deleted_comments: u64,
}

// -- Comments --

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub thread_id: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentListQuery {
    #[serde(rename = "threadID")]
    pub thread_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentListResponse {
    pub comments: Vec<CommentView>,
    pub is_limit_reached: bool,
    pub max_comments: u64,
    pub comment_count: u64,
}

// -- Shared --

/// Returned by create calls: the surrogate id of the new row.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
