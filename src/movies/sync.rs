use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::{debug, error, info, warn};

use crate::error::{AppError, StoreError};
use crate::movies::repo::{MovieStore, NewMovie};
use crate::starwars::client::CatalogClient;
use crate::state::AppState;

/// One sync run: fetch the full remote film list, then reconcile record by
/// record with insert-if-absent. Sync never updates or deletes; existing
/// episodes are skipped. Each record is handled independently, so one bad
/// record does not abort the run.
pub async fn synchronize_movies(
    catalog: &dyn CatalogClient,
    movies: &dyn MovieStore,
) -> Result<u64, AppError> {
    let films = catalog.fetch_films().await.map_err(|e| {
        error!(error = %e, "catalog fetch failed");
        AppError::SyncFailed
    })?;

    // A well-formed catalog response always carries at least one film; an
    // empty list means the remote is broken, not that there is nothing to do.
    if films.is_empty() {
        error!("catalog returned an empty film list");
        return Err(AppError::SyncFailed);
    }

    let mut inserted = 0u64;
    for film in films {
        let episode_id = film.episode_id;
        let existing = match movies.find_by_episode_id(episode_id).await {
            Ok(found) => found,
            Err(e) => {
                warn!(episode_id, error = %e, "lookup failed, skipping record");
                continue;
            }
        };
        if existing.is_some() {
            continue;
        }
        match movies.create(NewMovie::from(film)).await {
            Ok(_) => {
                inserted += 1;
                debug!(episode_id, "movie inserted from catalog");
            }
            // Another writer got there between the check and the insert; the
            // unique episode constraint makes this a benign skip.
            Err(StoreError::Duplicate) => {
                debug!(episode_id, "movie appeared concurrently, skipping")
            }
            Err(StoreError::Other(e)) => warn!(episode_id, error = %e, "insert failed, skipping record"),
        }
    }

    info!(inserted, "catalog sync finished");
    Ok(inserted)
}

/// Background scheduler: one run at process start, then one run per day at
/// midnight UTC. A failed run is only logged; the next trigger is the retry.
pub fn spawn_sync_scheduler(state: AppState) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        run(&state).await;
        loop {
            let wait = until_next_midnight(OffsetDateTime::now_utc());
            debug!(seconds = wait.as_secs(), "next catalog sync scheduled");
            tokio::time::sleep(wait).await;
            run(&state).await;
        }
    })
}

async fn run(state: &AppState) {
    if let Err(e) = synchronize_movies(state.catalog.as_ref(), state.movies.as_ref()).await {
        error!(error = %e, "catalog sync run failed");
    }
}

fn until_next_midnight(now: OffsetDateTime) -> std::time::Duration {
    let next = now
        .date()
        .next_day()
        .map(|d| d.midnight().assume_utc())
        .unwrap_or(now + TimeDuration::days(1));
    (next - now)
        .try_into()
        .unwrap_or(std::time::Duration::from_secs(24 * 60 * 60))
}
