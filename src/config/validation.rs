use crate::config::types::{Config, CrawlConfig, FetchConfig, MirrorConfig};
use crate::ConfigError;
use url::Url;

/// Maximum accepted value for `max-retries`
const MAX_RETRIES_LIMIT: u32 = 10;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_mirror_config(&config.mirror)?;
    validate_fetch_config(&config.fetch)?;
    validate_crawl_config(&config.crawl)?;
    Ok(())
}

/// Validates the seed URL and output location
fn validate_mirror_config(config: &MirrorConfig) -> Result<(), ConfigError> {
    let seed = Url::parse(&config.seed_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", config.seed_url, e))
    })?;

    if seed.scheme() != "http" && seed.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Seed URL '{}' must use http or https, got {}",
            config.seed_url,
            seed.scheme()
        )));
    }

    if seed.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::Validation(format!(
            "Seed URL '{}' has no host",
            config.seed_url
        )));
    }

    if config.output_dir.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates transport settings
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "timeout_ms must be > 0".to_string(),
        ));
    }

    if config.connect_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "connect_timeout_ms must be > 0".to_string(),
        ));
    }

    if config.max_retries > MAX_RETRIES_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_retries must be <= {}, got {}",
            MAX_RETRIES_LIMIT, config.max_retries
        )));
    }

    Ok(())
}

/// Validates traversal settings
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.index_file.is_empty() {
        return Err(ConfigError::Validation(
            "index_file cannot be empty".to_string(),
        ));
    }

    if config.index_file.contains(['/', '\\'])
        || config.index_file == "."
        || config.index_file == ".."
    {
        return Err(ConfigError::Validation(format!(
            "index_file must be a plain file name, got '{}'",
            config.index_file
        )));
    }

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}
