//! Listing page fetcher
//!
//! This module handles all HTTP requests for the harvester:
//! - Building the HTTP client with a browser-like header set and timeout
//! - Resolving a page number to its listing address
//! - Fetching the page and decoding the body as UTF-8
//! - Handing the markup to the extractor on the blocking pool
//!
//! A page never fails the run. Every problem is reported through the
//! `PageOutcome` of an empty-records `FetchResult`.

use crate::config::{Config, PAGE_PLACEHOLDER};
use crate::crawler::extractor::{ArticleRecord, Extractor};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// User agent presented to listing sites
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

const BROWSER_ACCEPT_LANGUAGE: &str =
    "zh-CN,zh;q=0.8,zh-TW;q=0.7,zh-HK;q=0.5,en-US;q=0.3,en;q=0.2";

/// How a single page attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Container found and scanned (possibly yielding zero records)
    Parsed,

    /// Page fetched but the content container was absent
    ContainerMissing,

    /// Server answered with a non-success status
    HttpStatus(u16),

    /// Timeout, connection failure or body read failure
    Network(String),

    /// Extraction panicked on this page's markup
    ParseFailed(String),

    /// The worker running this page died unexpectedly
    WorkerFailed(String),
}

impl PageOutcome {
    /// Returns true if the page could not be scanned for records
    pub fn is_failure(&self) -> bool {
        !matches!(self, Self::Parsed)
    }

    /// Short label used in logs and summaries
    pub fn label(&self) -> String {
        match self {
            Self::Parsed => "parsed".to_string(),
            Self::ContainerMissing => "container missing".to_string(),
            Self::HttpStatus(code) => format!("HTTP {}", code),
            Self::Network(error) => format!("network error: {}", error),
            Self::ParseFailed(error) => format!("parse failed: {}", error),
            Self::WorkerFailed(error) => format!("worker failed: {}", error),
        }
    }
}

/// Result of one page attempt
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// Page number this result belongs to
    pub page: u32,

    /// Listing address that was requested
    pub source_list_url: String,

    /// Records in document order; empty on any failure
    pub records: Vec<ArticleRecord>,

    /// How the attempt ended
    pub outcome: PageOutcome,
}

impl FetchResult {
    /// Builds a zero-record result for a failed page
    pub fn empty(page: u32, source_list_url: String, outcome: PageOutcome) -> Self {
        Self {
            page,
            source_list_url,
            records: Vec::new(),
            outcome,
        }
    }
}

/// Builds an HTTP client with the browser header set
///
/// # Arguments
///
/// * `timeout` - Upper bound for a whole request, body included
///
/// # Example
///
/// ```no_run
/// use page_harvest::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(Duration::from_secs(15)).unwrap();
/// ```
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE),
    );

    Client::builder()
        .user_agent(BROWSER_USER_AGENT)
        .default_headers(headers)
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Resolves a page number to its listing address
///
/// Page 1 uses `first_page_url` verbatim when one is given; every other
/// page substitutes its number into `url_pattern`.
pub fn resolve_list_url(page: u32, url_pattern: &str, first_page_url: Option<&str>) -> String {
    match first_page_url {
        Some(first) if page == 1 => first.to_string(),
        _ => url_pattern.replace(PAGE_PLACEHOLDER, &page.to_string()),
    }
}

/// Fetches listing pages and extracts their records
#[derive(Debug)]
pub struct PageFetcher {
    client: Client,
    extractor: Arc<Extractor>,
    url_pattern: String,
    first_page_url: Option<String>,
}

impl PageFetcher {
    pub fn new(
        client: Client,
        extractor: Arc<Extractor>,
        url_pattern: impl Into<String>,
        first_page_url: Option<String>,
    ) -> Self {
        Self {
            client,
            extractor,
            url_pattern: url_pattern.into(),
            first_page_url,
        }
    }

    /// Builds the client and extractor described by `config`
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        let client = build_http_client(Duration::from_secs(config.request_timeout_secs))?;
        let extractor = Arc::new(Extractor::new(&config.extraction)?);

        Ok(Self::new(
            client,
            extractor,
            config.base_url.clone(),
            config.first_page_override().map(str::to_string),
        ))
    }

    /// Listing address for `page`
    pub fn list_url(&self, page: u32) -> String {
        resolve_list_url(page, &self.url_pattern, self.first_page_url.as_deref())
    }

    /// Fetches one listing page and extracts its records
    ///
    /// Never fails: network errors, non-success statuses, a missing
    /// container and extraction panics all produce an empty-records result
    /// whose `outcome` says what went wrong.
    pub async fn fetch(&self, page: u32) -> FetchResult {
        let list_url = self.list_url(page);
        tracing::info!("Fetching page {}: {}", page, list_url);

        let body = match self.fetch_body(&list_url).await {
            Ok(body) => body,
            Err(outcome) => {
                tracing::warn!("Request failed {}: {}", list_url, outcome.label());
                return FetchResult::empty(page, list_url, outcome);
            }
        };

        let extractor = Arc::clone(&self.extractor);
        let source = list_url.clone();
        let parsed = tokio::task::spawn_blocking(move || extractor.extract(&body, &source)).await;

        match parsed {
            Ok(Some(records)) => FetchResult {
                page,
                source_list_url: list_url,
                records,
                outcome: PageOutcome::Parsed,
            },
            Ok(None) => {
                tracing::warn!("Page {}: content container not found at {}", page, list_url);
                FetchResult::empty(page, list_url, PageOutcome::ContainerMissing)
            }
            Err(e) => {
                tracing::error!("Failed to process page {} ({}): {}", page, list_url, e);
                FetchResult::empty(page, list_url, PageOutcome::ParseFailed(e.to_string()))
            }
        }
    }

    /// GETs `url` and decodes the body as UTF-8 whatever the declared charset
    async fn fetch_body(&self, url: &str) -> Result<String, PageOutcome> {
        let response = self.client.get(url).send().await.map_err(classify_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PageOutcome::HttpStatus(status.as_u16()));
        }

        let bytes = response.bytes().await.map_err(classify_error)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn classify_error(e: reqwest::Error) -> PageOutcome {
    if e.is_timeout() {
        PageOutcome::Network("Request timeout".to_string())
    } else if e.is_connect() {
        PageOutcome::Network(format!("Connection failed: {}", e))
    } else {
        PageOutcome::Network(e.to_string())
    }
}
