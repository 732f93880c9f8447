use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Validate the bearer token and attach the caller's `Identity` to the
/// request for the handler to pick up with `Extension<Identity>`.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let identity = state.gate.validate(presented)?;
    debug!("Authenticated {} ({})", identity.name, identity.user_id);

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}
