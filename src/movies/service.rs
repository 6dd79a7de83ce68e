use tracing::info;
use uuid::Uuid;

use crate::error::{AppError, StoreError};
use crate::movies::repo::{Movie, MovieStore, MovieUpdate, NewMovie};

pub async fn create_movie(store: &dyn MovieStore, new: NewMovie) -> Result<Movie, AppError> {
    if store.find_by_episode_id(new.episode_id).await?.is_some() {
        return Err(AppError::DuplicateMovie);
    }
    match store.create(new).await {
        Ok(movie) => {
            info!(movie_id = %movie.id, episode_id = movie.episode_id, "movie created");
            Ok(movie)
        }
        Err(StoreError::Duplicate) => Err(AppError::DuplicateMovie),
        Err(e) => Err(e.into()),
    }
}

pub async fn list_movies(store: &dyn MovieStore) -> Result<Vec<Movie>, AppError> {
    Ok(store.find_all().await?)
}

pub async fn get_movie(store: &dyn MovieStore, id: Uuid) -> Result<Movie, AppError> {
    store
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("movie"))
}

pub async fn update_movie(
    store: &dyn MovieStore,
    id: Uuid,
    patch: MovieUpdate,
) -> Result<Movie, AppError> {
    store
        .update(id, patch)
        .await?
        .ok_or(AppError::NotFound("movie"))
}

pub async fn delete_movie(store: &dyn MovieStore, id: Uuid) -> Result<Movie, AppError> {
    let movie = store
        .delete(id)
        .await?
        .ok_or(AppError::NotFound("movie"))?;
    info!(movie_id = %movie.id, episode_id = movie.episode_id, "movie deleted");
    Ok(movie)
}
