use crate::config::types::{ClassifierConfig, Config, CrawlerConfig, SiteConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_site_config(&config.site)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_classifier_config(&config.classifier)?;

    if config.output.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates worker pool and stop-condition settings
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.workers < 1 {
        return Err(ConfigError::Validation(format!(
            "workers must be >= 1, got {}",
            config.workers
        )));
    }

    if config.queue_capacity < 1 {
        return Err(ConfigError::Validation(format!(
            "queue_capacity must be >= 1, got {}",
            config.queue_capacity
        )));
    }

    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be > 0".to_string(),
        ));
    }

    if config.run_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "run_timeout_secs must be > 0".to_string(),
        ));
    }

    if config.max_records < 1 {
        return Err(ConfigError::Validation(
            "max_records must be >= 1".to_string(),
        ));
    }

    if config.monitor_interval_secs == 0 {
        return Err(ConfigError::Validation(
            "monitor_interval_secs must be > 0".to_string(),
        ));
    }

    Ok(())
}

/// Validates the site section: base URL, article prefix and seeds
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let base = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base_url '{}' must use http or https",
            config.base_url
        )));
    }

    let base_host = base
        .host_str()
        .ok_or_else(|| ConfigError::InvalidUrl(format!("base_url '{}' has no host", config.base_url)))?
        .to_lowercase();

    if !config.article_prefix.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "article_prefix must start with '/', got '{}'",
            config.article_prefix
        )));
    }

    if config.seeds.is_empty() {
        return Err(ConfigError::Validation(
            "at least one seed URL is required".to_string(),
        ));
    }

    for seed in &config.seeds {
        let url = Url::parse(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))?;

        let seed_host = url.host_str().map(str::to_lowercase);
        if seed_host.as_deref() != Some(base_host.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Seed URL '{}' is not on the crawled site '{}'",
                seed, base_host
            )));
        }
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    if !config.contact_email.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            config.contact_email
        )));
    }

    Ok(())
}

/// Validates classification rules
fn validate_classifier_config(config: &ClassifierConfig) -> Result<(), ConfigError> {
    if config.default.trim().is_empty() {
        return Err(ConfigError::Validation(
            "classifier default label cannot be empty".to_string(),
        ));
    }

    for rule in &config.rules {
        if rule.label.trim().is_empty() {
            return Err(ConfigError::Validation(
                "classifier rule label cannot be empty".to_string(),
            ));
        }

        if rule.keywords.is_empty() || rule.keywords.iter().any(|k| k.is_empty()) {
            return Err(ConfigError::Validation(format!(
                "classifier rule '{}' needs at least one non-empty keyword",
                rule.label
            )));
        }
    }

    Ok(())
}
