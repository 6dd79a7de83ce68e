use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub mod dto;
pub mod guard;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;
pub mod service;

pub fn router(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/auth", get(handlers::list_users))
        .route("/auth/:id", get(handlers::get_user))
        .route_layer(middleware::from_fn(guard::admin_only))
        .route_layer(middleware::from_fn_with_state(state, guard::authenticate));

    Router::new()
        .route("/auth", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .merge(admin)
}
