use axum::{routing::get, Router};

use crate::state::AppState;

pub mod client;
pub mod handlers;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/starwars/films", get(handlers::get_films))
        .route("/starwars/films/:id", get(handlers::get_film))
}
