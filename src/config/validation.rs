use crate::config::types::Config;
use crate::ConfigError;
use scraper::Selector;

/// Validates a configuration after parsing
///
/// # Arguments
///
/// * `config` - The configuration to validate
///
/// # Returns
///
/// * `Ok(())` - Configuration is valid
/// * `Err(ConfigError)` - A field holds an unusable value
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.crawler.max_pages == 0 {
        return Err(ConfigError::Validation(
            "max-pages must be at least 1".to_string(),
        ));
    }

    if config.crawler.concurrency == 0 {
        return Err(ConfigError::Validation(
            "concurrency must be at least 1".to_string(),
        ));
    }

    if config.crawler.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent must not be empty".to_string(),
        ));
    }

    if config.render.min_content_length == 0 {
        return Err(ConfigError::Validation(
            "min-content-length must be at least 1".to_string(),
        ));
    }

    if config.render.content_script_ratio == 0 {
        return Err(ConfigError::Validation(
            "content-script-ratio must be at least 1".to_string(),
        ));
    }

    for selector in &config.render.root_selectors {
        if Selector::parse(selector).is_err() {
            return Err(ConfigError::Validation(format!(
                "invalid root selector: {}",
                selector
            )));
        }
    }

    if config.browser.navigation_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "navigation-timeout-ms must be at least 1".to_string(),
        ));
    }

    if config.browser.selector_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "selector-timeout-ms must be at least 1".to_string(),
        ));
    }

    Ok(())
}
