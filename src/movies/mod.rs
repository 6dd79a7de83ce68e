use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use crate::auth::guard;
use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;
pub mod service;
pub mod sync;

pub fn router(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/movies", post(handlers::create_movie))
        .route(
            "/movies/:id",
            patch(handlers::update_movie).delete(handlers::delete_movie),
        )
        .route_layer(middleware::from_fn(guard::admin_only))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            guard::authenticate,
        ));

    // Reads need a valid token but no particular role.
    let authenticated = Router::new()
        .route("/movies/:id", get(handlers::get_movie))
        .route_layer(middleware::from_fn_with_state(state, guard::authenticate));

    Router::new()
        .route("/movies", get(handlers::list_movies))
        .merge(admin)
        .merge(authenticated)
}
