use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::movies::repo::NewMovie;

/// Film record as served by the remote catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Film {
    pub title: String,
    pub episode_id: i32,
    pub opening_crawl: String,
    pub director: String,
    pub producer: String,
    pub release_date: String,
}

impl From<Film> for NewMovie {
    fn from(film: Film) -> Self {
        NewMovie {
            title: film.title,
            episode_id: film.episode_id,
            opening_crawl: film.opening_crawl,
            director: film.director,
            producer: film.producer,
            release_date: film.release_date,
        }
    }
}

/// Remote catalog of films. Errors cover transport and parse failures alike.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn fetch_films(&self) -> anyhow::Result<Vec<Film>>;
    async fn fetch_film(&self, id: u32) -> anyhow::Result<Option<Film>>;
}

#[derive(Debug, Deserialize)]
struct FilmsPage {
    results: Vec<Film>,
}

pub struct SwapiClient {
    http: reqwest::Client,
    base_url: String,
}

impl SwapiClient {
    pub fn new(base_url: String) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { http, base_url })
    }
}

#[async_trait]
impl CatalogClient for SwapiClient {
    async fn fetch_films(&self) -> anyhow::Result<Vec<Film>> {
        let url = format!("{}/films/", self.base_url);
        let page: FilmsPage = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(page.results)
    }

    async fn fetch_film(&self, id: u32) -> anyhow::Result<Option<Film>> {
        let url = format!("{}/films/{}/", self.base_url, id);
        let resp = self.http.get(&url).send().await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let film: Film = resp.error_for_status()?.json().await?;
        Ok(Some(film))
    }
}

/// Canned catalog used by `AppState::fake()` and the test suite.
pub struct FakeCatalogClient {
    films: Vec<Film>,
    fail: bool,
    calls: Mutex<u32>,
}

impl FakeCatalogClient {
    pub fn with_films(films: Vec<Film>) -> Self {
        Self {
            films,
            fail: false,
            calls: Mutex::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            films: Vec::new(),
            fail: true,
            calls: Mutex::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl CatalogClient for FakeCatalogClient {
    async fn fetch_films(&self) -> anyhow::Result<Vec<Film>> {
        *self.calls.lock().unwrap() += 1;
        if self.fail {
            anyhow::bail!("connection refused");
        }
        Ok(self.films.clone())
    }

    async fn fetch_film(&self, id: u32) -> anyhow::Result<Option<Film>> {
        if self.fail {
            anyhow::bail!("connection refused");
        }
        Ok(self
            .films
            .iter()
            .find(|f| f.episode_id == id as i32)
            .cloned())
    }
}
