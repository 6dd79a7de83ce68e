use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for user registration. The role is never client-supplied.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
}
