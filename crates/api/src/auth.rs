//! Bearer-token authentication.
//!
//! Every authenticated route extracts an [`AuthActor`], decoding the JWT
//! from the `Authorization: Bearer` header. The resolved
//! [`Actor`](metamind_core::types::Actor) is then passed explicitly into
//! the pipeline services -- no ambient session state.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{decode, DecodingKey, Validation};
use metamind_core::error::CoreError;
use metamind_core::types::{Actor, DbId};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

/// JWT settings loaded from the environment.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
}

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var      | Required |
    /// |--------------|----------|
    /// | `JWT_SECRET` | **yes**  |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");
        Self { secret }
    }
}

/// JWT claims embedded in every access token.
#[derive(Debug, Deserialize)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// Expiration time (UTC Unix timestamp); validated by `jsonwebtoken`.
    pub exp: i64,
}

/// Extractor resolving the authenticated actor from the bearer token.
#[derive(Debug, Clone, Copy)]
pub struct AuthActor(pub Actor);

impl FromRequestParts<AppState> for AuthActor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Missing bearer token".into()))
            })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Malformed Authorization header".into()))
        })?;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(state.jwt.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| AppError::Core(CoreError::Unauthorized(format!("Invalid token: {e}"))))?;

        Ok(AuthActor(Actor::new(data.claims.sub)))
    }
}
