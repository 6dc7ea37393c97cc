use crate::config::types::{Config, ExtractionRules, PAGE_PLACEHOLDER};
use crate::{ConfigError, ConfigResult};
use regex::Regex;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_storage(config)?;
    validate_page_range(config)?;
    validate_addresses(config)?;
    validate_workers(config)?;
    validate_extraction_rules(&config.extraction)?;
    Ok(())
}

fn validate_storage(config: &Config) -> ConfigResult<()> {
    if config.db_path.trim().is_empty() {
        return Err(ConfigError::Validation("dbPath cannot be empty".to_string()));
    }
    Ok(())
}

fn validate_page_range(config: &Config) -> ConfigResult<()> {
    if config.start_page > config.end_page {
        return Err(ConfigError::Validation(format!(
            "startPage ({}) must not be greater than endPage ({})",
            config.start_page, config.end_page
        )));
    }
    Ok(())
}

/// Validates the listing template and the optional page 1 override
fn validate_addresses(config: &Config) -> ConfigResult<()> {
    if !config.base_url.contains(PAGE_PLACEHOLDER) {
        return Err(ConfigError::Validation(format!(
            "baseUrl must contain the {} placeholder, got '{}'",
            PAGE_PLACEHOLDER, config.base_url
        )));
    }

    let sample = config
        .base_url
        .replace(PAGE_PLACEHOLDER, &config.start_page.to_string());
    validate_http_url(&sample, "baseUrl")?;

    if let Some(first) = config.first_page_override() {
        validate_http_url(first, "firstPageUrl")?;
    }

    Ok(())
}

fn validate_http_url(raw: &str, key: &str) -> ConfigResult<()> {
    let url = Url::parse(raw)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", key, raw, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            key, raw
        )));
    }

    Ok(())
}

fn validate_workers(config: &Config) -> ConfigResult<()> {
    if config.max_workers < 1 || config.max_workers > 100 {
        return Err(ConfigError::Validation(format!(
            "maxWorkers must be between 1 and 100, got {}",
            config.max_workers
        )));
    }

    if config.request_timeout_secs < 1 || config.request_timeout_secs > 300 {
        return Err(ConfigError::Validation(format!(
            "requestTimeoutSecs must be between 1 and 300, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Checks that every selector parses and the article pattern compiles
pub fn validate_extraction_rules(rules: &ExtractionRules) -> ConfigResult<()> {
    for (key, selector) in [
        ("containerSelector", &rules.container_selector),
        ("titleSelector", &rules.title_selector),
        ("visibleTimeSelector", &rules.visible_time_selector),
        ("hiddenTimeSelector", &rules.hidden_time_selector),
        ("hiddenMonthSelector", &rules.hidden_month_selector),
        ("hiddenDaySelector", &rules.hidden_day_selector),
    ] {
        Selector::parse(selector).map_err(|e| {
            ConfigError::InvalidSelector(format!("{} '{}': {:?}", key, selector, e))
        })?;
    }

    Regex::new(&rules.article_pattern).map_err(|e| {
        ConfigError::InvalidPattern(format!("'{}': {}", rules.article_pattern, e))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            db_path: "./articles.db".to_string(),
            base_url: "https://example.com/list/{page}.html".to_string(),
            start_page: 1,
            end_page: 5,
            first_page_url: String::new(),
            max_workers: 10,
            request_timeout_secs: 15,
            extraction: ExtractionRules::default(),
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&base_config()).is_ok());
    }

    #[test]
    fn test_missing_placeholder() {
        let mut config = base_config();
        config.base_url = "https://example.com/list.html".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_inverted_range() {
        let mut config = base_config();
        config.start_page = 9;
        config.end_page = 3;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_single_page_range() {
        let mut config = base_config();
        config.start_page = 4;
        config.end_page = 4;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_worker_bounds() {
        let mut config = base_config();
        config.max_workers = 0;
        assert!(validate(&config).is_err());

        config.max_workers = 101;
        assert!(validate(&config).is_err());

        config.max_workers = 1;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_bad_first_page_url() {
        let mut config = base_config();
        config.first_page_url = "not a url".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));

        config.first_page_url = "ftp://example.com/index".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_bad_selector() {
        let mut config = base_config();
        config.extraction.title_selector = "h5[".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidSelector(_))
        ));
    }

    #[test]
    fn test_bad_pattern() {
        let mut config = base_config();
        config.extraction.article_pattern = r"^https://(\d+".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_empty_db_path() {
        let mut config = base_config();
        config.db_path = "  ".to_string();
        assert!(validate(&config).is_err());
    }
}
