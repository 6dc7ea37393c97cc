use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigResult;
use std::path::Path;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Picks the format from the file extension, defaulting to TOML
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Toml,
        }
    }
}

/// Loads and parses a configuration file from the given path
///
/// Files ending in `.yaml` or `.yml` are read as YAML, everything else as
/// TOML. Keys use camelCase (`dbPath`, `baseUrl`, `startPage`, ...).
///
/// # Arguments
///
/// * `path` - Path to the configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use page_harvest::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Pages {}..={}", config.start_page, config.end_page);
/// ```
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content, ConfigFormat::from_path(path))
}

/// Parses and validates configuration text in the given format
pub fn parse_config(content: &str, format: ConfigFormat) -> ConfigResult<Config> {
    let config: Config = match format {
        ConfigFormat::Toml => toml::from_str(content)?,
        ConfigFormat::Yaml => serde_yaml::from_str(content)?,
    };

    validate(&config)?;

    Ok(config)
}
