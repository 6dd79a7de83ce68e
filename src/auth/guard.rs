use axum::{
    extract::{FromRef, Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;
use uuid::Uuid;

use crate::auth::jwt::JwtKeys;
use crate::auth::repo::Role;
use crate::error::AppError;
use crate::state::AppState;

/// Resolved token claims, attached to request extensions by `authenticate`
/// for downstream consumers.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

/// Access guard: requires a valid bearer token and attaches the resolved
/// identity. No side effects beyond the extension insert.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let keys = JwtKeys::from_ref(&state);

    let header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthenticated)?;

    let token = header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .ok_or(AppError::Unauthenticated)?;

    let claims = keys.verify(token).map_err(|_| {
        warn!("invalid or expired token");
        AppError::Unauthenticated
    })?;

    req.extensions_mut().insert(Identity {
        user_id: claims.sub,
        email: claims.email,
        role: claims.role,
    });

    Ok(next.run(req).await)
}

/// Role guard: a second, independent gate. It never touches the token; it
/// only checks the identity `authenticate` attached against the allow-set
/// declared for the route. Membership test, not a hierarchy.
pub async fn require_roles(
    allowed: &[Role],
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if allowed.is_empty() {
        return Ok(next.run(req).await);
    }
    let identity = req
        .extensions()
        .get::<Identity>()
        .ok_or(AppError::Forbidden)?;
    if !allowed.contains(&identity.role) {
        warn!(user_id = %identity.user_id, role = ?identity.role, "insufficient role");
        return Err(AppError::Forbidden);
    }
    Ok(next.run(req).await)
}

pub async fn admin_only(req: Request, next: Next) -> Result<Response, AppError> {
    require_roles(&[Role::Admin], req, next).await
}
