//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the block page
//! service. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the block page service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BlockPageConfig {
    /// Listener configuration (bind address, request deadline).
    pub listener: ListenerConfig,

    /// Gateway REST API used to resolve rule names.
    pub upstream: UpstreamConfig,

    /// Retry configuration for upstream lookups.
    pub retries: RetryConfig,

    /// Rule name cache settings.
    pub cache: CacheConfig,

    /// CORS allow-list for JSON responses.
    pub cors: CorsConfig,

    /// Rendered page settings.
    pub page: PageConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Total time allowed for one inbound request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Gateway API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the gateway REST API, without trailing slash.
    pub api_base_url: String,

    /// Bearer token. Empty means unconfigured.
    pub api_token: String,

    /// Account identifier. Empty means unconfigured.
    pub account_id: String,

    /// Per-attempt timeout in seconds.
    pub request_timeout_secs: u64,

    /// Bound on one whole lookup (all attempts and backoff waits) in seconds.
    /// Must stay below `listener.request_timeout_secs`.
    pub lookup_deadline_secs: u64,

    /// Honour HTTP(S)_PROXY environment variables.
    pub system_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.cloudflare.com/client/v4".to_string(),
            api_token: String::new(),
            account_id: String::new(),
            request_timeout_secs: 10,
            lookup_deadline_secs: 20,
            system_proxy: true,
        }
    }
}

/// API credentials, present only when both halves are configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_token: String,
    pub account_id: String,
}

impl UpstreamConfig {
    /// Token and account id, or `None` when either is blank.
    pub fn credentials(&self) -> Option<Credentials> {
        let api_token = self.api_token.trim();
        let account_id = self.account_id.trim();
        if api_token.is_empty() || account_id.is_empty() {
            return None;
        }
        Some(Credentials {
            api_token: api_token.to_string(),
            account_id: account_id.to_string(),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn lookup_deadline(&self) -> Duration {
        Duration::from_secs(self.lookup_deadline_secs)
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt (3 means 4 attempts in total).
    pub max_retries: u32,

    /// Delay before the first retry in milliseconds; doubles per attempt.
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
        }
    }
}

/// Rule name cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Entry lifetime in seconds.
    pub ttl_secs: u64,

    /// How often the in-process store drops expired entries, in seconds.
    pub sweep_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 3600,
            sweep_interval_secs: 300,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// CORS configuration. Empty allow-list means closed.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CorsConfig {
    /// Exact origins allowed to read JSON responses.
    pub allowed_origins: Vec<String>,
}

/// Rendered page configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PageConfig {
    /// Administrator contact shown on the HTML page.
    pub admin_email: Option<String>,

    /// Page heading and `<title>`.
    pub title: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            admin_email: None,
            title: "Access Blocked".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format: "pretty", "compact" or "json".
    pub log_format: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
