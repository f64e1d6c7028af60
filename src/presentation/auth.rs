use axum::Json;
use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::UserId;
use crate::presentation::handlers::ErrorResponse;
use crate::presentation::state::AppState;

/// The authenticated principal, extracted from a bearer JWT.
///
/// Every owner-scoped handler takes this extractor; a missing or invalid
/// token is rejected with 401 before the handler body runs.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: UserId,
}

#[derive(Deserialize)]
struct Claims {
    sub: String,
    #[allow(dead_code)]
    exp: usize,
}

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| unauthorized("missing bearer token"))?;

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(state.settings.auth.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|error| {
            tracing::warn!(%error, "rejected bearer token");
            unauthorized("invalid or expired token")
        })?;

        let user_uuid = Uuid::parse_str(&decoded.claims.sub)
            .map_err(|_| unauthorized("invalid subject claim"))?;

        Ok(AuthContext {
            user_id: UserId::from_uuid(user_uuid),
        })
    }
}

fn unauthorized(detail: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: detail.to_string(),
        }),
    )
}
