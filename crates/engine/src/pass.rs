use chrono::{Duration, Utc};
use tracing::{debug, info, warn};

use flowreap_history::HistoryStore;

use crate::config::{CleanupConfig, FilterStrategy};
use crate::error::CleanupError;

/// Run one cleanup pass to completion.
///
/// Repeatedly fetches one page of finished instances (oldest first,
/// offset 0) and deletes the eligible ones until a termination
/// condition is reached. Any store error aborts the pass immediately;
/// deletions already performed stand, and a retried pass naturally
/// skips them because its first page no longer contains them.
pub async fn run_cleanup_pass(
    store: &dyn HistoryStore,
    config: &CleanupConfig,
) -> Result<(), CleanupError> {
    if config.batch_size == 0 {
        return Err(CleanupError::Config("expected batch size > 0".to_string()));
    }
    let max_age = Duration::from_std(config.max_age)
        .map_err(|e| CleanupError::Config(format!("max age out of range: {e}")))?;

    let mut total_deleted = 0usize;
    let mut finished = false;
    while !finished {
        let (batch_finished, deleted) = match config.strategy {
            FilterStrategy::ServerSide => {
                run_server_batch(store, max_age, config.batch_size).await?
            }
            FilterStrategy::ClientSide => {
                run_client_batch(store, max_age, config.batch_size).await?
            }
        };
        finished = batch_finished;
        total_deleted += deleted;
    }

    info!(
        deleted = total_deleted,
        strategy = ?config.strategy,
        "cleanup pass finished"
    );
    Ok(())
}

/// One batch under server-side filtering.
///
/// The cutoff constrains the page on the engine side, so every
/// returned instance is eligible by construction and is deleted
/// unconditionally. A page shorter than the batch size proves the
/// engine has nothing further matching the cutoff.
async fn run_server_batch(
    store: &dyn HistoryStore,
    max_age: Duration,
    batch_size: usize,
) -> Result<(bool, usize), CleanupError> {
    let before = Utc::now() - max_age;
    let page = store.list_finished_before(batch_size, before).await?;

    for instance in &page {
        info!(id = %instance.id, "deleting history instance");
        store.delete_instance(&instance.id).await?;
    }

    Ok((page.len() != batch_size, page.len()))
}

/// One batch under client-side filtering.
///
/// The page is unfiltered but sorted ascending by end time, so the
/// scan deletes from the front and the first instance younger than the
/// threshold ends the whole pass: everything after it is younger
/// still. Instances whose end time is missing or unparsable are
/// skipped with a warning rather than aborting; they are never
/// deleted.
async fn run_client_batch(
    store: &dyn HistoryStore,
    max_age: Duration,
    batch_size: usize,
) -> Result<(bool, usize), CleanupError> {
    let page = store.list_finished(batch_size).await?;
    let now = Utc::now();

    let mut deleted = 0usize;
    for instance in &page {
        let Some(end_time) = instance.end_time_parsed() else {
            warn!(
                id = %instance.id,
                end_time = instance.end_time.as_deref().unwrap_or("<none>"),
                "unparsable end time, skipping instance"
            );
            continue;
        };

        if now.signed_duration_since(end_time) > max_age {
            info!(id = %instance.id, "deleting history instance");
            store.delete_instance(&instance.id).await?;
            deleted += 1;
        } else {
            debug!(id = %instance.id, "instance younger than max age, pass complete");
            return Ok((true, deleted));
        }
    }

    Ok((page.len() != batch_size, deleted))
}
