//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, TTL > 0, bounded retries)
//! - Check that addresses, URLs and origins parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BlockPageConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::BlockPageConfig;

/// Upper bound on `retries.max_retries`.
pub const MAX_RETRIES_LIMIT: u32 = 10;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a fully loaded configuration.
pub fn validate_config(config: &BlockPageConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }
    if config.listener.request_timeout_secs == 0 {
        errors.push(ValidationError::new("listener.request_timeout_secs", "must be > 0"));
    }

    match Url::parse(&config.upstream.api_base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && !url.cannot_be_a_base() => {}
        Ok(url) => errors.push(ValidationError::new(
            "upstream.api_base_url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(
            "upstream.api_base_url",
            format!("invalid URL: {}", e),
        )),
    }
    if config.upstream.request_timeout_secs == 0 {
        errors.push(ValidationError::new("upstream.request_timeout_secs", "must be > 0"));
    }
    if config.upstream.lookup_deadline_secs == 0 {
        errors.push(ValidationError::new("upstream.lookup_deadline_secs", "must be > 0"));
    } else if config.upstream.lookup_deadline_secs >= config.listener.request_timeout_secs
        && config.listener.request_timeout_secs > 0
    {
        errors.push(ValidationError::new(
            "upstream.lookup_deadline_secs",
            format!(
                "must be < listener.request_timeout_secs ({})",
                config.listener.request_timeout_secs
            ),
        ));
    }

    if config.retries.max_retries > MAX_RETRIES_LIMIT {
        errors.push(ValidationError::new(
            "retries.max_retries",
            format!("must be <= {}", MAX_RETRIES_LIMIT),
        ));
    }

    if config.cache.ttl_secs == 0 {
        errors.push(ValidationError::new("cache.ttl_secs", "must be > 0"));
    }
    if config.cache.sweep_interval_secs == 0 {
        errors.push(ValidationError::new("cache.sweep_interval_secs", "must be > 0"));
    }

    for origin in &config.cors.allowed_origins {
        if let Err(message) = check_origin(origin) {
            errors.push(ValidationError::new("cors.allowed_origins", message));
        }
    }

    if let Some(email) = &config.page.admin_email {
        if !email.contains('@') {
            errors.push(ValidationError::new(
                "page.admin_email",
                format!("'{}' is not an email address", email),
            ));
        }
    }

    if !matches!(config.observability.log_format.as_str(), "pretty" | "compact" | "json") {
        errors.push(ValidationError::new(
            "observability.log_format",
            format!("unknown format '{}'", config.observability.log_format),
        ));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// An origin is `scheme://host[:port]` with nothing after it, compared verbatim
/// against the request `Origin` header.
fn check_origin(origin: &str) -> Result<(), String> {
    let url = Url::parse(origin).map_err(|e| format!("'{}': {}", origin, e))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(format!("'{}' is not an http(s) origin", origin));
    }
    if url.origin().ascii_serialization() != origin {
        return Err(format!("'{}' must be a bare origin without path or trailing slash", origin));
    }
    Ok(())
}
