//! Shared helpers for the HTTP integration tests.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use board_api::{AppState, AppStateInner, AuthGate};
use board_db::Database;
use serde_json::Value;
use tower::ServiceExt;

/// Router plus direct access to its state for seeding and inspection.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: Router,
    pub state: AppState,
}

#[allow(dead_code)]
impl TestServer {
    pub fn new() -> Self {
        let db = Database::open_in_memory().expect("Failed to open in-memory database");
        let gate = AuthGate::new(b"integration-test-secret", chrono::Duration::hours(24));
        let state = AppStateInner::new(db, gate);
        Self {
            router: board_api::router(state.clone()),
            state,
        }
    }

    /// Seed a user without going through password hashing and return a
    /// bearer token for it.
    pub fn user_with_token(&self, name: &str) -> (i64, String) {
        let id = self
            .state
            .db
            .create_user(name, "not-a-real-hash")
            .expect("Failed to seed user");
        let token = self.state.gate.issue(id, name).expect("Failed to issue token");
        (id, token)
    }

    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        auth_token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = auth_token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }

        let body = match body {
            Some(v) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(serde_json::to_vec(&v).unwrap())
            }
            None => Body::empty(),
        };

        let request = builder.body(body).unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let json: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }
}
