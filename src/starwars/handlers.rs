use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{error, instrument};

use crate::error::AppError;
use crate::starwars::client::Film;
use crate::state::AppState;

#[instrument(skip(state))]
pub async fn get_films(State(state): State<AppState>) -> Result<Json<Vec<Film>>, AppError> {
    let films = state.catalog.fetch_films().await.map_err(|e| {
        error!(error = %e, "catalog fetch failed");
        AppError::SyncFailed
    })?;
    Ok(Json(films))
}

#[instrument(skip(state))]
pub async fn get_film(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<Film>, AppError> {
    let film = state
        .catalog
        .fetch_film(id)
        .await
        .map_err(|e| {
            error!(error = %e, "catalog fetch failed");
            AppError::SyncFailed
        })?
        .ok_or(AppError::NotFound("film"))?;
    Ok(Json(film))
}
