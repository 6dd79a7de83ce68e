use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::dto::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo::{NewUser, Role, User, UserStore};
use crate::config::BootstrapAdmin;
use crate::error::{AppError, StoreError};

/// Check-then-create registration. The store's unique constraint is the
/// backstop when two registrations race past the pre-check.
pub async fn register(
    users: &dyn UserStore,
    input: RegisterRequest,
) -> Result<RegisterResponse, AppError> {
    if users.find_by_email(&input.email).await?.is_some() {
        return Err(AppError::DuplicateUser);
    }

    let password_hash = hash_password(&input.password)?;
    let new = NewUser {
        name: input.name,
        email: input.email,
        password_hash,
        role: Role::User,
    };

    match users.create(new).await {
        Ok(user) => {
            info!(user_id = %user.id, email = %user.email, "user registered");
            Ok(RegisterResponse {
                message: "user created successfully",
                user_id: user.id,
            })
        }
        Err(StoreError::Duplicate) => Err(AppError::DuplicateUser),
        Err(e) => Err(e.into()),
    }
}

/// An unknown email and a wrong password produce the same error kind, and
/// the hash comparison runs either way so the two cases stay uniform.
pub async fn login(
    users: &dyn UserStore,
    keys: &JwtKeys,
    input: LoginRequest,
) -> Result<LoginResponse, AppError> {
    let user = users.find_by_email(&input.email).await?;

    let stored_hash = user.as_ref().map(|u| u.password_hash.as_str()).unwrap_or("");
    let password_ok = verify_password(&input.password, stored_hash);

    let Some(user) = user.filter(|_| password_ok) else {
        return Err(AppError::InvalidCredentials);
    };

    let access_token = keys.sign(&user)?;
    info!(user_id = %user.id, "user logged in");
    Ok(LoginResponse { access_token })
}

pub async fn list_users(users: &dyn UserStore) -> Result<Vec<User>, AppError> {
    Ok(users.find_all().await?)
}

pub async fn get_user(users: &dyn UserStore, id: Uuid) -> Result<User, AppError> {
    users
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("user"))
}

/// One-time seeding step run at process start: create a single admin from
/// the configured credentials when none exists. Idempotent; losing a create
/// race to another instance is fine.
pub async fn ensure_admin(users: &dyn UserStore, admin: &BootstrapAdmin) -> anyhow::Result<()> {
    let existing = users.find_all().await.map_err(anyhow::Error::from)?;
    if existing.iter().any(|u| u.role == Role::Admin) {
        debug!("admin account already present, skipping bootstrap");
        return Ok(());
    }

    let password_hash = hash_password(&admin.password)?;
    let new = NewUser {
        name: admin.name.clone(),
        email: admin.email.clone(),
        password_hash,
        role: Role::Admin,
    };
    match users.create(new).await {
        Ok(user) => info!(user_id = %user.id, "bootstrap admin created"),
        Err(StoreError::Duplicate) => debug!("bootstrap admin created concurrently"),
        Err(StoreError::Other(e)) => return Err(e),
    }
    Ok(())
}
