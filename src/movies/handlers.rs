use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::instrument;
use uuid::Uuid;

use crate::error::AppError;
use crate::movies::dto::{CreateMovieRequest, DeleteMovieResponse, UpdateMovieRequest};
use crate::movies::repo::Movie;
use crate::movies::service;
use crate::state::AppState;

fn check_not_empty(value: &str, message: &'static str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(message));
    }
    Ok(())
}

fn check_create(payload: &CreateMovieRequest) -> Result<(), AppError> {
    check_not_empty(&payload.title, "title is required")?;
    check_not_empty(&payload.opening_crawl, "opening crawl is required")?;
    check_not_empty(&payload.director, "director is required")?;
    check_not_empty(&payload.producer, "producer is required")?;
    check_not_empty(&payload.release_date, "release date is required")?;
    Ok(())
}

#[instrument(skip(state, payload))]
pub async fn create_movie(
    State(state): State<AppState>,
    Json(payload): Json<CreateMovieRequest>,
) -> Result<(StatusCode, Json<Movie>), AppError> {
    check_create(&payload)?;
    let movie = service::create_movie(state.movies.as_ref(), payload.into()).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

#[instrument(skip(state))]
pub async fn list_movies(State(state): State<AppState>) -> Result<Json<Vec<Movie>>, AppError> {
    let movies = service::list_movies(state.movies.as_ref()).await?;
    Ok(Json(movies))
}

#[instrument(skip(state))]
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Movie>, AppError> {
    let movie = service::get_movie(state.movies.as_ref(), id).await?;
    Ok(Json(movie))
}

#[instrument(skip(state, payload))]
pub async fn update_movie(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMovieRequest>,
) -> Result<Json<Movie>, AppError> {
    let movie = service::update_movie(state.movies.as_ref(), id, payload.into()).await?;
    Ok(Json(movie))
}

#[instrument(skip(state))]
pub async fn delete_movie(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteMovieResponse>, AppError> {
    let movie = service::delete_movie(state.movies.as_ref(), id).await?;
    Ok(Json(DeleteMovieResponse {
        message: "movie deleted successfully",
        movie,
    }))
}
