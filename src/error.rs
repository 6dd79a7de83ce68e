use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Client-visible error taxonomy for the whole service.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("user already exists")]
    DuplicateUser,
    #[error("movie already exists")]
    DuplicateMovie,
    #[error("{0}")]
    Validation(&'static str),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid or missing token")]
    Unauthenticated,
    #[error("you do not have permission to access this route")]
    Forbidden,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("catalog synchronization failed")]
    SyncFailed,
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DuplicateUser => "DUPLICATE_USER",
            Self::DuplicateMovie => "DUPLICATE_MOVIE",
            Self::Validation(_) => "VALIDATION",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::SyncFailed => "SYNC_FAILED",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::DuplicateUser | Self::DuplicateMovie | Self::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::InvalidCredentials | Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::SyncFailed => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // 4xx are expected client outcomes and already show up in the request
        // trace; only internal errors carry a chain worth logging here.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}

/// Errors surfaced by the store adapters. `Duplicate` marks a unique-key
/// violation so callers can fold a lost create race into the same outcome
/// their existence pre-check would have produced.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("duplicate key")]
    Duplicate,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if matches!(db_err.kind(), sqlx::error::ErrorKind::UniqueViolation) {
                return StoreError::Duplicate;
            }
        }
        StoreError::Other(e.into())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            // A duplicate that reaches here slipped past a call-site match;
            // reads never produce it.
            StoreError::Duplicate => AppError::Internal(anyhow::anyhow!("unexpected duplicate key")),
            StoreError::Other(e) => AppError::Internal(e),
        }
    }
}
