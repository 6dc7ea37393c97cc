//! Output module for run summaries and store reports
//!
//! This module handles:
//! - Per-page reports and the end-of-run summary
//! - Statistics read back from an existing store

pub mod stats;
mod summary;

pub use stats::{load_statistics, print_statistics, HarvestStatistics};
pub use summary::{print_summary, PageReport, RunSummary};
