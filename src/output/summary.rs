//! End-of-run summary
//!
//! Collects per-page reports while a run is in progress and renders the
//! final totals once it completes.

use crate::crawler::PageOutcome;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// What a single page contributed to the run
#[derive(Debug, Clone)]
pub struct PageReport {
    /// Page number
    pub page: u32,

    /// Listing address that was requested
    pub list_url: String,

    /// Records extracted from the page (before dedup)
    pub records: usize,

    /// How the attempt ended
    pub outcome: PageOutcome,
}

/// Final totals of a harvest run
///
/// `records_extracted` counts every record produced by extraction,
/// duplicates included. `distinct_urls` is read from the store after the
/// last write, so `records_extracted >= newly_stored` always holds.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// When the run entered the running state
    pub started_at: DateTime<Utc>,

    /// Wall-clock duration of the run
    pub elapsed: Duration,

    /// Pages that produced a result
    pub pages_attempted: usize,

    /// Pages that could not be scanned for records
    pub pages_failed: usize,

    /// Records extracted across all pages, duplicates included
    pub records_extracted: usize,

    /// Rows this run added to the store
    pub newly_stored: usize,

    /// Distinct URLs in the store at the end of the run
    pub distinct_urls: u64,

    /// Per-page reports in completion order
    pub pages: Vec<PageReport>,
}

impl RunSummary {
    /// Page reports sorted by page number
    pub fn pages_in_order(&self) -> Vec<&PageReport> {
        let mut pages: Vec<&PageReport> = self.pages.iter().collect();
        pages.sort_by_key(|report| report.page);
        pages
    }

    /// Reports for pages that could not be scanned
    pub fn failed_pages(&self) -> Vec<&PageReport> {
        self.pages_in_order()
            .into_iter()
            .filter(|report| report.outcome.is_failure())
            .collect()
    }
}

/// Prints the run summary to stdout
pub fn print_summary(summary: &RunSummary) {
    println!();
    println!("=== Harvest Complete ===\n");
    println!(
        "  Started: {}",
        summary.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!("  Elapsed: {:.2} s", summary.elapsed.as_secs_f64());
    println!("  Pages attempted: {}", summary.pages_attempted);
    println!("  Pages failed: {}", summary.pages_failed);
    println!("  Records extracted: {}", summary.records_extracted);
    println!("  Newly stored: {}", summary.newly_stored);
    println!("  Distinct URLs in store: {}", summary.distinct_urls);

    let failed = summary.failed_pages();
    if !failed.is_empty() {
        println!("\nFailed Pages ({}):", failed.len());
        for report in failed {
            println!(
                "  - page {} ({}): {}",
                report.page,
                report.list_url,
                report.outcome.label()
            );
        }
    }
}
