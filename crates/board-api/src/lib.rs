pub mod auth;
pub mod comments;
pub mod error;
pub mod middleware;
pub mod state;
pub mod threads;

use axum::{
    Json, Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use auth::AuthGate;
pub use error::ApiError;
pub use state::{AppState, AppStateInner};

/// Build the HTTP surface. Thread and comment creation require a bearer
/// token; everything else is public.
pub fn router(state: AppState) -> Router {
    let require_auth = from_fn_with_state(state.clone(), middleware::require_auth);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/users", post(auth::register))
        .route("/api/login", post(auth::login))
        .route(
            "/api/threads",
            post(threads::create_thread)
                .route_layer(require_auth.clone())
                .get(threads::list_threads),
        )
        .route(
            "/api/threads/{id}",
            get(threads::get_thread).delete(threads::delete_thread),
        )
        .route(
            "/api/comments",
            post(comments::create_comment)
                .route_layer(require_auth)
                .get(comments::list_comments),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
