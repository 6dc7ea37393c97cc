//! Record extractor for listing pages
//!
//! Pulls article records out of a listing page's markup using the
//! configured CSS selectors. Every step is optional: a missing title or
//! publish time degrades to an empty string, never to a dropped record.

use crate::config::ExtractionRules;
use crate::{ConfigError, ConfigResult};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// An article link found on a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    /// Detail page address (unique key in the store)
    pub url: String,

    /// Title text, empty when the page carries none
    pub title: String,

    /// Free-form publish time, empty when the page carries none
    pub publish_time: String,

    /// Listing page the link was found on
    pub source_list_url: String,
}

/// Compiled extraction rules, shared read-only by all fetch workers
#[derive(Debug)]
pub struct Extractor {
    container: Selector,
    links: Selector,
    article_pattern: Regex,
    title: Selector,
    visible_time: Selector,
    hidden_time: Selector,
    hidden_month: Selector,
    hidden_day: Selector,
}

impl Extractor {
    /// Compiles the selectors and article pattern in `rules`
    pub fn new(rules: &ExtractionRules) -> ConfigResult<Self> {
        Ok(Self {
            container: compile_selector("containerSelector", &rules.container_selector)?,
            links: compile_selector("links", "a[href]")?,
            article_pattern: Regex::new(&rules.article_pattern).map_err(|e| {
                ConfigError::InvalidPattern(format!("'{}': {}", rules.article_pattern, e))
            })?,
            title: compile_selector("titleSelector", &rules.title_selector)?,
            visible_time: compile_selector("visibleTimeSelector", &rules.visible_time_selector)?,
            hidden_time: compile_selector("hiddenTimeSelector", &rules.hidden_time_selector)?,
            hidden_month: compile_selector("hiddenMonthSelector", &rules.hidden_month_selector)?,
            hidden_day: compile_selector("hiddenDaySelector", &rules.hidden_day_selector)?,
        })
    }

    /// Extracts article records from a listing page
    ///
    /// # Arguments
    ///
    /// * `html` - The listing page markup
    /// * `source_url` - The listing page address, copied into each record
    ///
    /// # Returns
    ///
    /// * `Some(records)` - The container was found; records are in document order
    /// * `None` - The page has no content container
    ///
    /// # Example
    ///
    /// ```
    /// use page_harvest::config::ExtractionRules;
    /// use page_harvest::crawler::Extractor;
    ///
    /// let extractor = Extractor::new(&ExtractionRules::default()).unwrap();
    /// let html = r#"<div class="col-sm-9 col-xs-12 xs-padding">
    ///     <a href="https://news.ruc.edu.cn/123.html"><h5 class="xs-padding xs-font-size">Hi</h5></a>
    /// </div>"#;
    /// let records = extractor.extract(html, "https://news.ruc.edu.cn/list").unwrap();
    /// assert_eq!(records[0].title, "Hi");
    /// ```
    pub fn extract(&self, html: &str, source_url: &str) -> Option<Vec<ArticleRecord>> {
        let document = Html::parse_document(html);
        let container = document.select(&self.container).next()?;

        let records = container
            .select(&self.links)
            .filter_map(|link| {
                let href = link.value().attr("href")?;
                if !self.article_pattern.is_match(href) {
                    return None;
                }

                Some(ArticleRecord {
                    url: href.to_string(),
                    title: self.title_of(link).unwrap_or_default(),
                    publish_time: self.publish_time_of(link).unwrap_or_default(),
                    source_list_url: source_url.to_string(),
                })
            })
            .collect();

        Some(records)
    }

    /// Returns true if `href` is a detail page address
    pub fn is_article_link(&self, href: &str) -> bool {
        self.article_pattern.is_match(href)
    }

    fn title_of(&self, link: ElementRef<'_>) -> Option<String> {
        first_text(link, &self.title)
    }

    /// Visible time first, then `{month}.{day}` from the hidden structure
    fn publish_time_of(&self, link: ElementRef<'_>) -> Option<String> {
        if let Some(visible) = first_text(link, &self.visible_time).filter(|t| !t.is_empty()) {
            return Some(visible);
        }

        let hidden = link.select(&self.hidden_time).next()?;
        let month = first_text(hidden, &self.hidden_month)?;
        let day = first_text(hidden, &self.hidden_day)?;
        Some(format!("{}.{}", month, day))
    }
}

/// Trimmed text of the first descendant of `element` matching `selector`
fn first_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|found| found.text().collect::<String>().trim().to_string())
}

fn compile_selector(key: &str, selector: &str) -> ConfigResult<Selector> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::InvalidSelector(format!("{} '{}': {:?}", key, selector, e)))
}
