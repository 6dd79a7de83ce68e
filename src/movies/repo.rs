use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::StoreError;

/// Movie record. `episode_id` is the natural key the catalog sync
/// reconciles on; the store enforces its uniqueness.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub episode_id: i32,
    pub opening_crawl: String,
    pub director: String,
    pub producer: String,
    pub release_date: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewMovie {
    pub title: String,
    pub episode_id: i32,
    pub opening_crawl: String,
    pub director: String,
    pub producer: String,
    pub release_date: String,
}

/// Partial update; `None` fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct MovieUpdate {
    pub title: Option<String>,
    pub opening_crawl: Option<String>,
    pub director: Option<String>,
    pub producer: Option<String>,
    pub release_date: Option<String>,
}

#[async_trait]
pub trait MovieStore: Send + Sync {
    async fn find_by_episode_id(&self, episode_id: i32) -> Result<Option<Movie>, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Movie>, StoreError>;
    async fn find_all(&self) -> Result<Vec<Movie>, StoreError>;
    async fn create(&self, new: NewMovie) -> Result<Movie, StoreError>;
    async fn update(&self, id: Uuid, patch: MovieUpdate) -> Result<Option<Movie>, StoreError>;
    async fn delete(&self, id: Uuid) -> Result<Option<Movie>, StoreError>;
}

pub struct PgMovieStore {
    db: PgPool,
}

impl PgMovieStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const MOVIE_COLUMNS: &str =
    "id, title, episode_id, opening_crawl, director, producer, release_date, created_at";

#[async_trait]
impl MovieStore for PgMovieStore {
    async fn find_by_episode_id(&self, episode_id: i32) -> Result<Option<Movie>, StoreError> {
        let movie = sqlx::query_as::<_, Movie>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies WHERE episode_id = $1"
        ))
        .bind(episode_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(movie)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Movie>, StoreError> {
        let movie =
            sqlx::query_as::<_, Movie>(&format!("SELECT {MOVIE_COLUMNS} FROM movies WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.db)
                .await?;
        Ok(movie)
    }

    async fn find_all(&self) -> Result<Vec<Movie>, StoreError> {
        let movies = sqlx::query_as::<_, Movie>(&format!(
            "SELECT {MOVIE_COLUMNS} FROM movies ORDER BY episode_id"
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(movies)
    }

    async fn create(&self, new: NewMovie) -> Result<Movie, StoreError> {
        let movie = sqlx::query_as::<_, Movie>(&format!(
            r#"
            INSERT INTO movies (title, episode_id, opening_crawl, director, producer, release_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {MOVIE_COLUMNS}
            "#
        ))
        .bind(&new.title)
        .bind(new.episode_id)
        .bind(&new.opening_crawl)
        .bind(&new.director)
        .bind(&new.producer)
        .bind(&new.release_date)
        .fetch_one(&self.db)
        .await?;
        Ok(movie)
    }

    async fn update(&self, id: Uuid, patch: MovieUpdate) -> Result<Option<Movie>, StoreError> {
        let movie = sqlx::query_as::<_, Movie>(&format!(
            r#"
            UPDATE movies SET
                title = COALESCE($2, title),
                opening_crawl = COALESCE($3, opening_crawl),
                director = COALESCE($4, director),
                producer = COALESCE($5, producer),
                release_date = COALESCE($6, release_date)
            WHERE id = $1
            RETURNING {MOVIE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.title)
        .bind(patch.opening_crawl)
        .bind(patch.director)
        .bind(patch.producer)
        .bind(patch.release_date)
        .fetch_optional(&self.db)
        .await?;
        Ok(movie)
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Movie>, StoreError> {
        let movie = sqlx::query_as::<_, Movie>(&format!(
            "DELETE FROM movies WHERE id = $1 RETURNING {MOVIE_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(movie)
    }
}

/// In-memory store with the same episode-uniqueness guarantee as the
/// database constraint.
#[derive(Default)]
pub struct MemoryMovieStore {
    movies: Mutex<Vec<Movie>>,
}

#[async_trait]
impl MovieStore for MemoryMovieStore {
    async fn find_by_episode_id(&self, episode_id: i32) -> Result<Option<Movie>, StoreError> {
        let movies = self.movies.lock().unwrap();
        Ok(movies.iter().find(|m| m.episode_id == episode_id).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Movie>, StoreError> {
        let movies = self.movies.lock().unwrap();
        Ok(movies.iter().find(|m| m.id == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Movie>, StoreError> {
        Ok(self.movies.lock().unwrap().clone())
    }

    async fn create(&self, new: NewMovie) -> Result<Movie, StoreError> {
        let mut movies = self.movies.lock().unwrap();
        if movies.iter().any(|m| m.episode_id == new.episode_id) {
            return Err(StoreError::Duplicate);
        }
        let movie = Movie {
            id: Uuid::new_v4(),
            title: new.title,
            episode_id: new.episode_id,
            opening_crawl: new.opening_crawl,
            director: new.director,
            producer: new.producer,
            release_date: new.release_date,
            created_at: OffsetDateTime::now_utc(),
        };
        movies.push(movie.clone());
        Ok(movie)
    }

    async fn update(&self, id: Uuid, patch: MovieUpdate) -> Result<Option<Movie>, StoreError> {
        let mut movies = self.movies.lock().unwrap();
        let Some(movie) = movies.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            movie.title = title;
        }
        if let Some(opening_crawl) = patch.opening_crawl {
            movie.opening_crawl = opening_crawl;
        }
        if let Some(director) = patch.director {
            movie.director = director;
        }
        if let Some(producer) = patch.producer {
            movie.producer = producer;
        }
        if let Some(release_date) = patch.release_date {
            movie.release_date = release_date;
        }
        Ok(Some(movie.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Movie>, StoreError> {
        let mut movies = self.movies.lock().unwrap();
        let Some(pos) = movies.iter().position(|m| m.id == id) else {
            return Ok(None);
        };
        Ok(Some(movies.remove(pos)))
    }
}
