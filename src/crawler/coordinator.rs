//! Harvest coordinator - run orchestration
//!
//! This module ties the pieces of a run together:
//! - Ensuring the store schema before any worker starts
//! - Moving the store into the single writer
//! - Dispatching the page range to the worker pool
//! - Routing each result to the writer in completion order
//! - Producing the run summary

use crate::config::Config;
use crate::crawler::dispatcher::Dispatcher;
use crate::crawler::fetcher::{FetchResult, PageFetcher};
use crate::output::{PageReport, RunSummary};
use crate::state::RunState;
use crate::storage::{ArticleStore, SqliteStore, StoreWriter, WriteRequest};
use crate::{HarvestError, Result};
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Main harvest coordinator
pub struct Harvester {
    config: Arc<Config>,
    fetcher: Arc<PageFetcher>,
    state: RunState,
}

/// Running totals while results are consumed
#[derive(Default)]
struct RunTally {
    records_extracted: usize,
    pages_failed: usize,
    pages: Vec<PageReport>,
}

impl RunTally {
    fn record(&mut self, result: &FetchResult) {
        self.records_extracted += result.records.len();
        if result.outcome.is_failure() {
            self.pages_failed += 1;
        }
        self.pages.push(PageReport {
            page: result.page,
            list_url: result.source_list_url.clone(),
            records: result.records.len(),
            outcome: result.outcome.clone(),
        });
    }
}

impl Harvester {
    /// Creates a new harvester
    ///
    /// Builds the HTTP client and compiles the extraction rules. Nothing is
    /// fetched until `run` is called.
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = PageFetcher::from_config(&config)?;
        Ok(Self::with_fetcher(config, fetcher))
    }

    /// Creates a harvester around an already built fetcher
    pub fn with_fetcher(config: Config, fetcher: PageFetcher) -> Self {
        Self {
            config: Arc::new(config),
            fetcher: Arc::new(fetcher),
            state: RunState::NotStarted,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> RunState {
        self.state
    }

    fn transition(&mut self, next: RunState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::debug!("Run state {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }

    /// Runs the harvest against `store`
    ///
    /// Every page in `[start_page, end_page]` is attempted once. Page
    /// failures are logged and counted; only a storage failure aborts the
    /// run. A harvester runs at most once.
    ///
    /// # Returns
    ///
    /// * `Ok(RunSummary)` - All pages attempted and all writes applied
    /// * `Err(HarvestError)` - The store failed or the harvester already ran
    pub async fn run<S>(&mut self, mut store: S) -> Result<RunSummary>
    where
        S: ArticleStore + 'static,
    {
        self.transition(RunState::Running)?;

        let started_at = Utc::now();
        let clock = Instant::now();

        store.ensure_schema()?;

        tracing::info!(
            "Harvesting pages {} to {} ({} pages) with {} workers",
            self.config.start_page,
            self.config.end_page,
            self.config.page_count(),
            self.config.max_workers
        );

        let writer = StoreWriter::spawn(store, self.config.max_workers);
        let dispatcher = Dispatcher::new(Arc::clone(&self.fetcher), self.config.max_workers);
        let mut results = dispatcher.dispatch(self.config.start_page..=self.config.end_page);

        let mut tally = RunTally::default();
        let mut writer_stopped = false;

        while let Some(result) = results.recv().await {
            tally.record(&result);
            tracing::info!(
                "Page {} extracted {} records",
                result.page,
                result.records.len()
            );

            if result.records.is_empty() {
                continue;
            }

            let request = WriteRequest {
                page: result.page,
                list_url: result.source_list_url,
                records: result.records,
            };

            if let Err(e) = writer.submit(request).await {
                tracing::error!("Stopping run at page {}: {}", result.page, e);
                writer_stopped = true;
                break;
            }
        }
        drop(results);

        let (store, report) = writer.finish().await?;
        if writer_stopped {
            return Err(HarvestError::WriterStopped(
                "writer closed before all pages were stored".to_string(),
            ));
        }

        let distinct_urls = store.count()?;
        self.transition(RunState::Completed)?;

        let summary = RunSummary {
            started_at,
            elapsed: clock.elapsed(),
            pages_attempted: tally.pages.len(),
            pages_failed: tally.pages_failed,
            records_extracted: tally.records_extracted,
            newly_stored: report.inserted,
            distinct_urls,
            pages: tally.pages,
        };

        tracing::info!(
            "Harvest completed: {} pages, {} records extracted, {} new, {} distinct URLs stored in {:?}",
            summary.pages_attempted,
            summary.records_extracted,
            summary.newly_stored,
            summary.distinct_urls,
            summary.elapsed
        );

        Ok(summary)
    }
}

/// Runs a complete harvest against the SQLite store named in `config`
///
/// # Example
///
/// ```no_run
/// use page_harvest::config::load_config;
/// use page_harvest::crawler::run_harvest;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let summary = run_harvest(config).await?;
/// println!("{} distinct URLs", summary.distinct_urls);
/// # Ok(())
/// # }
/// ```
pub async fn run_harvest(config: Config) -> Result<RunSummary> {
    let store = SqliteStore::open(Path::new(&config.db_path))?;
    let mut harvester = Harvester::new(config)?;
    harvester.run(store).await
}
