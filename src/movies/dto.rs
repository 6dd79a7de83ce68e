use serde::{Deserialize, Serialize};

use crate::movies::repo::{Movie, MovieUpdate, NewMovie};

#[derive(Debug, Deserialize)]
pub struct CreateMovieRequest {
    pub title: String,
    pub episode_id: i32,
    pub opening_crawl: String,
    pub director: String,
    pub producer: String,
    pub release_date: String,
}

impl From<CreateMovieRequest> for NewMovie {
    fn from(req: CreateMovieRequest) -> Self {
        NewMovie {
            title: req.title,
            episode_id: req.episode_id,
            opening_crawl: req.opening_crawl,
            director: req.director,
            producer: req.producer,
            release_date: req.release_date,
        }
    }
}

/// Partial update; the natural key is not patchable.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateMovieRequest {
    pub title: Option<String>,
    pub opening_crawl: Option<String>,
    pub director: Option<String>,
    pub producer: Option<String>,
    pub release_date: Option<String>,
}

impl From<UpdateMovieRequest> for MovieUpdate {
    fn from(req: UpdateMovieRequest) -> Self {
        MovieUpdate {
            title: req.title,
            opening_crawl: req.opening_crawl,
            director: req.director,
            producer: req.producer,
            release_date: req.release_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteMovieResponse {
    pub message: &'static str,
    pub movie: Movie,
}
