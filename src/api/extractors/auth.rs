use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
};
use crate::domain::models::user::Claims;
use crate::state::AppState;
use std::sync::Arc;
use tracing::Span;

/// Verified identity of the caller, pulled from `Authorization: Bearer`.
/// Missing credentials reject with 401, bad or expired tokens with 403.
pub struct AuthUser(pub Claims);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts.headers.get("Authorization")
            .ok_or(StatusCode::UNAUTHORIZED)?
            .to_str()
            .map_err(|_| StatusCode::UNAUTHORIZED)?;

        let token = header.strip_prefix("Bearer ")
            .ok_or(StatusCode::UNAUTHORIZED)?;

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let claims = app_state.auth_service.verify_token(token)
            .map_err(|_| StatusCode::FORBIDDEN)?;

        Span::current().record("user_id", &claims.sub);

        Ok(AuthUser(claims))
    }
}
