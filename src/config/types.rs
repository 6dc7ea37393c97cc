use serde::Deserialize;

/// Default number of concurrent page fetches
pub const DEFAULT_MAX_WORKERS: usize = 10;

/// Default upper bound for a single listing page request (seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

/// Placeholder substituted with the page number in `base_url`
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// Main configuration structure for Page-Harvest
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Path to the SQLite database file
    pub db_path: String,

    /// Listing address template containing `{page}`
    pub base_url: String,

    /// First page of the range (inclusive)
    pub start_page: u32,

    /// Last page of the range (inclusive)
    pub end_page: u32,

    /// Address used verbatim for page 1 when non-empty
    #[serde(default)]
    pub first_page_url: String,

    /// Size of the fetch worker pool
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Site-specific extraction rules
    #[serde(default)]
    pub extraction: ExtractionRules,
}

impl Config {
    /// Returns the optional page 1 override
    pub fn first_page_override(&self) -> Option<&str> {
        let trimmed = self.first_page_url.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }

    /// Number of pages in `[start_page, end_page]`
    pub fn page_count(&self) -> usize {
        if self.end_page < self.start_page {
            0
        } else {
            (self.end_page - self.start_page) as usize + 1
        }
    }
}

/// CSS selectors and link pattern used to pull records out of a listing page
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractionRules {
    /// The single element holding all article links
    pub container_selector: String,

    /// Regex a link target must match in full to count as an article
    pub article_pattern: String,

    /// Heading element inside the link carrying the title
    pub title_selector: String,

    /// Visible publish time element inside the link
    pub visible_time_selector: String,

    /// Hidden structure holding the split publish time
    pub hidden_time_selector: String,

    /// Year/month fragment inside the hidden structure
    pub hidden_month_selector: String,

    /// Day fragment inside the hidden structure
    pub hidden_day_selector: String,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self {
            container_selector: "div.col-sm-9.col-xs-12.xs-padding".to_string(),
            article_pattern: r"^https://news\.ruc\.edu\.cn/\d+\.html$".to_string(),
            title_selector: "h5.xs-padding.xs-font-size".to_string(),
            visible_time_selector: "p.visible-xs".to_string(),
            hidden_time_selector: "div.pp-box-time".to_string(),
            hidden_month_selector: "span".to_string(),
            hidden_day_selector: "p".to_string(),
        }
    }
}

fn default_max_workers() -> usize {
    DEFAULT_MAX_WORKERS
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}
