//! CORS policy for JSON responses.
//!
//! Closed by default. A request `Origin` on the allow-list is echoed back;
//! anything else, including a missing header, gets the literal `null`.

use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE, VARY,
};
use axum::http::{HeaderMap, HeaderValue};
use std::collections::HashSet;

use crate::config::CorsConfig;

#[derive(Debug, Clone, Default)]
pub struct CorsPolicy {
    allowed: HashSet<String>,
}

impl CorsPolicy {
    pub fn from_config(config: &CorsConfig) -> Self {
        Self {
            allowed: config.allowed_origins.iter().cloned().collect(),
        }
    }

    pub fn is_allowed(&self, origin: &str) -> bool {
        self.allowed.contains(origin)
    }

    /// `Access-Control-Allow-Origin` value for a request carrying `origin`.
    pub fn allow_origin(&self, origin: Option<&HeaderValue>) -> HeaderValue {
        match origin {
            Some(value) if value.to_str().is_ok_and(|o| self.is_allowed(o)) => value.clone(),
            _ => HeaderValue::from_static("null"),
        }
    }

    /// Add the CORS response headers to `headers`.
    pub fn apply(&self, request_origin: Option<&HeaderValue>, headers: &mut HeaderMap) {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin(request_origin));
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, OPTIONS"),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Accept, Content-Type"),
        );
        headers.insert(VARY, HeaderValue::from_static("Origin"));
    }

    /// Headers for an `OPTIONS` preflight response.
    pub fn apply_preflight(&self, request_origin: Option<&HeaderValue>, headers: &mut HeaderMap) {
        self.apply(request_origin, headers);
        headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static("86400"));
    }
}
