//! Single-writer actor for the article store
//!
//! The store is moved into one blocking task that owns it exclusively.
//! Fetch workers never touch the store; the coordinator forwards each page's
//! records as a `WriteRequest` over a bounded channel and the writer applies
//! them one batch at a time.

use crate::crawler::ArticleRecord;
use crate::storage::traits::{ArticleStore, StorageError, StorageResult};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// One listing page's worth of records headed for the store
#[derive(Debug, Clone)]
pub struct WriteRequest {
    /// Page number the records were extracted from
    pub page: u32,

    /// Listing URL recorded alongside every row
    pub list_url: String,

    /// Records in document order
    pub records: Vec<ArticleRecord>,
}

/// Totals reported by the writer once its channel closes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriterReport {
    /// Number of batches applied
    pub batches: usize,

    /// Rows actually inserted (duplicates excluded)
    pub inserted: usize,
}

/// Handle to a running store writer
pub struct StoreWriter<S> {
    sender: mpsc::Sender<WriteRequest>,
    task: JoinHandle<StorageResult<(S, WriterReport)>>,
}

impl<S> StoreWriter<S>
where
    S: ArticleStore + 'static,
{
    /// Moves `store` into a dedicated blocking task
    ///
    /// # Arguments
    ///
    /// * `store` - The store; owned by the writer until `finish`
    /// * `capacity` - Number of pending batches before `submit` waits
    pub fn spawn(store: S, capacity: usize) -> Self {
        let (sender, mut receiver) = mpsc::channel::<WriteRequest>(capacity.max(1));

        let task = tokio::task::spawn_blocking(move || {
            let mut store = store;
            let mut report = WriterReport::default();

            while let Some(request) = receiver.blocking_recv() {
                let inserted = match store.insert_or_ignore(&request.records, &request.list_url) {
                    Ok(n) => n,
                    Err(e) => {
                        tracing::error!(
                            "Store write failed for page {} ({}): {}",
                            request.page,
                            request.list_url,
                            e
                        );
                        return Err(e);
                    }
                };

                report.batches += 1;
                report.inserted += inserted;

                tracing::debug!(
                    "Page {}: stored {} of {} records",
                    request.page,
                    inserted,
                    request.records.len()
                );
            }

            Ok((store, report))
        });

        Self { sender, task }
    }

    /// Queues a batch for the writer
    ///
    /// Waits while the channel is full. Fails with `WriterClosed` if the
    /// writer has stopped, which only happens after a storage error.
    pub async fn submit(&self, request: WriteRequest) -> StorageResult<()> {
        self.sender
            .send(request)
            .await
            .map_err(|_| StorageError::WriterClosed)
    }

    /// Closes the channel, waits for pending batches and returns the store
    ///
    /// If the writer stopped on a storage error, that error is returned.
    pub async fn finish(self) -> StorageResult<(S, WriterReport)> {
        drop(self.sender);

        match self.task.await {
            Ok(result) => result,
            Err(e) => Err(StorageError::WriterFailed(e.to_string())),
        }
    }
}
