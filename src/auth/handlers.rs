use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    Extension, Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::instrument;
use uuid::Uuid;

use crate::auth::dto::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::auth::guard::Identity;
use crate::auth::jwt::JwtKeys;
use crate::auth::repo::User;
use crate::auth::service;
use crate::error::AppError;
use crate::state::AppState;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn check_password(password: &str) -> Result<(), AppError> {
    if password.len() < 8 {
        return Err(AppError::Validation(
            "password must be at least 8 characters long",
        ));
    }
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(has_lower && has_upper && has_digit) {
        return Err(AppError::Validation(
            "password must contain at least one uppercase letter, one lowercase letter and one number",
        ));
    }
    Ok(())
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("name is required"));
    }
    if !is_valid_email(&payload.email) {
        return Err(AppError::Validation("invalid email"));
    }
    check_password(&payload.password)?;

    let resp = service::register(state.users.as_ref(), payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if !is_valid_email(&payload.email) {
        return Err(AppError::Validation("invalid email"));
    }
    let keys = JwtKeys::from_ref(&state);
    let resp = service::login(state.users.as_ref(), &keys, payload).await?;
    Ok(Json(resp))
}

#[instrument(skip(state), fields(requested_by = %identity.user_id))]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<User>>, AppError> {
    let users = service::list_users(state.users.as_ref()).await?;
    Ok(Json(users))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    let user = service::get_user(state.users.as_ref(), id).await?;
    Ok(Json(user))
}
