//! Work dispatcher for a page range
//!
//! This module handles:
//! - Submitting one fetch task per page, in ascending page order
//! - Bounding the number of in-flight fetches with a semaphore
//! - Delivering results on a channel in completion order
//! - Converting a dead worker into an empty result for its page

use crate::crawler::fetcher::{FetchResult, PageFetcher, PageOutcome};
use std::future::Future;
use std::ops::RangeInclusive;
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};

/// Dispatcher feeds pages to a fixed-size pool of fetch workers
///
/// Each worker holds one pool permit from the moment its page is submitted
/// until its result has been queued, so at most `max_workers` pages are in
/// flight at any time.
pub struct Dispatcher {
    fetcher: Arc<PageFetcher>,
    pool: Arc<Semaphore>,
    max_workers: usize,
}

impl Dispatcher {
    /// Creates a dispatcher
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Shared fetcher used by every worker
    /// * `max_workers` - Pool size (at least 1)
    pub fn new(fetcher: Arc<PageFetcher>, max_workers: usize) -> Self {
        let max_workers = max_workers.max(1);
        Self {
            fetcher,
            pool: Arc::new(Semaphore::new(max_workers)),
            max_workers,
        }
    }

    /// Starts fetching every page in `pages`
    ///
    /// Returns the result queue. Exactly one `FetchResult` arrives per page,
    /// in the order pages finish. The queue closes once every submitted page
    /// has reported. Dropping the receiver stops further submissions.
    pub fn dispatch(self, pages: RangeInclusive<u32>) -> mpsc::Receiver<FetchResult> {
        let (tx, rx) = mpsc::channel(self.max_workers);

        tokio::spawn(async move {
            let mut submitted = 0usize;

            for page in pages {
                if tx.is_closed() {
                    tracing::warn!("Result queue closed, not submitting page {} onward", page);
                    break;
                }

                let permit = match Arc::clone(&self.pool).acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => break,
                };

                let fetcher = Arc::clone(&self.fetcher);
                let tx = tx.clone();

                tokio::spawn(async move {
                    let list_url = fetcher.list_url(page);
                    let work = {
                        let fetcher = Arc::clone(&fetcher);
                        async move { fetcher.fetch(page).await }
                    };
                    let result = run_guarded(page, list_url, work).await;

                    if tx.send(result).await.is_err() {
                        tracing::debug!("Result queue closed, dropping page {}", page);
                    }
                    drop(permit);
                });

                submitted += 1;
            }

            tracing::debug!("Submitted {} pages to the worker pool", submitted);
        });

        rx
    }
}

/// Runs one page's work on its own task
///
/// A panic inside `work` is reported as `WorkerFailed` for `page` instead of
/// tearing down the dispatcher.
async fn run_guarded<F>(page: u32, list_url: String, work: F) -> FetchResult
where
    F: Future<Output = FetchResult> + Send + 'static,
{
    match tokio::spawn(work).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Page {} worker failed ({}): {}", page, list_url, e);
            FetchResult::empty(page, list_url, PageOutcome::WorkerFailed(e.to_string()))
        }
    }
}
