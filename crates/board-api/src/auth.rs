use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::WithRejection;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use tracing::{debug, info};

use board_db::Database;
use board_types::api::{Claims, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use board_types::models::Identity;

use crate::error::ApiError;
use crate::state::{AppState, run_blocking};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid user")]
    InvalidUser,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("missing token")]
    MissingToken,

    #[error("invalid token")]
    InvalidToken,

    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Issues and validates HS256 identity tokens.
///
/// Built once at startup from the configured secret and shared read-only.
#[derive(Clone)]
pub struct AuthGate {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    lifetime: chrono::Duration,
}

impl AuthGate {
    pub fn new(secret: &[u8], lifetime: chrono::Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is compared against an explicit clock in `validate_at`
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            lifetime,
        }
    }

    pub fn issue(&self, user_id: i64, name: &str) -> Result<String, AuthError> {
        self.issue_at(user_id, name, Utc::now())
    }

    pub fn issue_at(&self, user_id: i64, name: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        let claims = Claims {
            user_id,
            name: name.to_string(),
            exp: (now + self.lifetime).timestamp(),
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    /// Validate an `Authorization` value; the `Bearer ` prefix is optional.
    pub fn validate(&self, presented: Option<&str>) -> Result<Identity, AuthError> {
        self.validate_at(presented, Utc::now())
    }

    pub fn validate_at(&self, presented: Option<&str>, now: DateTime<Utc>) -> Result<Identity, AuthError> {
        let raw = presented.map(str::trim_start).unwrap_or_default();
        let token = raw.strip_prefix("Bearer ").unwrap_or(raw).trim();
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }

        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| {
                debug!("Token rejected: {}", e);
                AuthError::InvalidToken
            })?
            .claims;

        if claims.exp <= now.timestamp() {
            debug!("Token for user {} expired", claims.user_id);
            return Err(AuthError::InvalidToken);
        }
        let expires_at = DateTime::from_timestamp(claims.exp, 0).ok_or(AuthError::InvalidToken)?;

        Ok(Identity {
            user_id: claims.user_id,
            name: claims.name,
            expires_at,
        })
    }

    /// Check a name/password pair against the credential store and issue a
    /// token on success.
    pub fn authenticate(&self, db: &Database, name: &str, password: &str) -> Result<String, ApiError> {
        let user = db.get_user_by_name(name)?.ok_or(AuthError::InvalidUser)?;

        let parsed_hash = PasswordHash::new(&user.pw_hash)
            .map_err(|e| ApiError::Internal(format!("stored hash for user {} unreadable: {}", user.id, e)))?;

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::InvalidPassword)?;

        Ok(self.issue(user.id, &user.name)?)
    }
}

/// Hash a password with Argon2id and a fresh salt, as a PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {e}")))?;
    Ok(hash.to_string())
}

pub async fn register(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<RegisterRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::Validation("Name must not be empty".into()));
    }
    if req.password.is_empty() {
        return Err(ApiError::Validation("Password must not be empty".into()));
    }

    let stored_name = name.clone();
    let id = run_blocking(&state, move |state| {
        if state.db.get_user_by_name(&stored_name)?.is_some() {
            return Err(ApiError::Conflict("User already exists".into()));
        }
        let pw_hash = hash_password(&req.password)?;
        Ok(state.db.create_user(&stored_name, &pw_hash)?)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(RegisterResponse { id, name })))
}

pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let name = req.name.trim().to_string();
    let lookup = name.clone();
    let token = run_blocking(&state, move |state| {
        state.gate.authenticate(&state.db, &lookup, &req.password)
    })
    .await?;

    info!("Issued token for {}", name);
    Ok(Json(LoginResponse { token }))
}
