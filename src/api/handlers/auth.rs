use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use crate::api::dtos::requests::{LoginRequest, RegisterRequest};
use crate::api::dtos::responses::{AuthResponse, UserProfile};
use crate::domain::models::user::User;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tracing::info;

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() || payload.email.trim().is_empty() {
        return Err(AppError::Validation("Name, email, and password are required".into()));
    }
    if !payload.email.contains('@') {
        return Err(AppError::Validation("Invalid email format".into()));
    }
    if payload.password.len() < 6 {
        return Err(AppError::Validation("Password must be at least 6 characters long".into()));
    }

    if state.user_repo.find_by_email(&payload.email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let password_hash = state.auth_service.hash_password(&payload.password)?;
    let user = User::new(payload.name, payload.email, password_hash);
    let created = state.user_repo.create(&user).await?;

    info!("User registered: {}", created.id);
    Ok((StatusCode::CREATED, Json(UserProfile::from(&created))))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_repo.find_by_email(&payload.email).await?
        .ok_or(AppError::Unauthorized)?;

    state.auth_service.verify_password(&payload.password, &user.password_hash)?;

    let token = state.auth_service.issue_token(&user)?;

    info!("User logged in: {}", user.id);
    Ok(Json(AuthResponse {
        token,
        user: UserProfile::from(&user),
    }))
}
