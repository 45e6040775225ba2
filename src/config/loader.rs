//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::BlockPageConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: {message}")]
    Env { var: &'static str, message: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Environment variables layered over the file configuration.
pub const ENV_API_TOKEN: &str = "API_TOKEN";
pub const ENV_ACCOUNT_ID: &str = "ACCOUNT_ID";
pub const ENV_ADMIN_EMAIL: &str = "ADMIN_EMAIL";
pub const ENV_CACHE_TTL: &str = "CACHE_TTL";
pub const ENV_ALLOWED_ORIGINS: &str = "ALLOWED_ORIGINS";
pub const ENV_API_BASE_URL: &str = "API_BASE_URL";
pub const ENV_BIND_ADDRESS: &str = "BIND_ADDRESS";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

/// Load configuration: optional TOML file, then process environment, then
/// validation.
pub fn load_config(path: Option<&Path>) -> Result<BlockPageConfig, ConfigError> {
    load_config_with(path, |_| {})
}

/// Like [`load_config`], with `overrides` (CLI flags) applied on top of the
/// environment and before validation.
pub fn load_config_with<F>(path: Option<&Path>, overrides: F) -> Result<BlockPageConfig, ConfigError>
where
    F: FnOnce(&mut BlockPageConfig),
{
    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => BlockPageConfig::default(),
    };

    let mut config = apply_env_overrides(config, |var| std::env::var(var).ok())?;
    overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment values onto `config`. `lookup` abstracts the process
/// environment so tests can feed a fixed map.
pub fn apply_env_overrides<F>(mut config: BlockPageConfig, lookup: F) -> Result<BlockPageConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = lookup(ENV_API_TOKEN) {
        config.upstream.api_token = token;
    }
    if let Some(account) = lookup(ENV_ACCOUNT_ID) {
        config.upstream.account_id = account;
    }
    if let Some(base) = lookup(ENV_API_BASE_URL) {
        config.upstream.api_base_url = base.trim_end_matches('/').to_string();
    }
    if let Some(email) = lookup(ENV_ADMIN_EMAIL) {
        let email = email.trim();
        config.page.admin_email = if email.is_empty() {
            None
        } else {
            Some(email.to_string())
        };
    }
    if let Some(ttl) = lookup(ENV_CACHE_TTL) {
        config.cache.ttl_secs = ttl.trim().parse().map_err(|e| ConfigError::Env {
            var: ENV_CACHE_TTL,
            message: format!("'{}': {}", ttl, e),
        })?;
    }
    if let Some(origins) = lookup(ENV_ALLOWED_ORIGINS) {
        config.cors.allowed_origins = split_origins(&origins);
    }
    if let Some(bind) = lookup(ENV_BIND_ADDRESS) {
        config.listener.bind_address = bind;
    }
    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        config.observability.log_level = level;
    }

    Ok(config)
}

/// Split a comma-separated origin list, dropping blanks.
pub fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let config = apply_env_overrides(
            BlockPageConfig::default(),
            env(&[
                ("API_TOKEN", "secret"),
                ("ACCOUNT_ID", "acc"),
                ("CACHE_TTL", " 120 "),
                ("ALLOWED_ORIGINS", "https://a.example, ,https://b.example"),
                ("ADMIN_EMAIL", "it@corp.example"),
            ]),
        )
        .unwrap();

        assert_eq!(config.cache.ttl_secs, 120);
        assert_eq!(
            config.cors.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.page.admin_email.as_deref(), Some("it@corp.example"));
        assert!(config.upstream.credentials().is_some());
    }

    #[test]
    fn test_bad_ttl_is_rejected() {
        let err = apply_env_overrides(BlockPageConfig::default(), env(&[("CACHE_TTL", "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Env { var: "CACHE_TTL", .. }));
    }

    #[test]
    fn test_missing_env_keeps_file_values() {
        let mut file = BlockPageConfig::default();
        file.cache.ttl_secs = 42;
        let config = apply_env_overrides(file, env(&[])).unwrap();
        assert_eq!(config.cache.ttl_secs, 42);
        assert!(config.page.admin_email.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join("gateway_block_page_loader_test.toml");
        fs::write(&path, "[page]\ntitle = \"Blocked by IT\"\n").unwrap();

        let config = load_config(Some(path.as_path())).unwrap();
        assert_eq!(config.page.title, "Blocked by IT");

        fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_validation_error_display() {
        let err = ConfigError::Validation(vec![ValidationError {
            field: "cache.ttl_secs",
            message: "must be > 0".into(),
        }]);
        assert_eq!(err.to_string(), "Validation failed: cache.ttl_secs: must be > 0");
    }

    #[test]
    fn test_overrides_are_validated() {
        let err = load_config_with(None, |config| {
            config.listener.bind_address = "not-an-address".into();
        })
        .unwrap_err();

        match err {
            ConfigError::Validation(errors) => {
                assert!(errors.iter().any(|e| e.field == "listener.bind_address"));
            }
            other => panic!("expected validation error, got {other}"),
        }
    }
}
