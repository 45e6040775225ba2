//! Gateway context extraction.
//!
//! # Responsibilities
//! - Parse the redirect query string the gateway appends
//! - Resolve parameter aliases (first present alias wins)
//! - Decide JSON vs HTML from the Accept header
//!
//! # Design Decisions
//! - The raw query is decoded leniently; a malformed query never becomes a 400
//! - Empty values count as absent
//! - `timestamp` alone is not gateway context

use axum::http::header::ACCEPT;
use axum::http::HeaderMap;
use std::collections::HashMap;

const RULE_ID_KEYS: &[&str] = &["rule_id", "ruleid", "cf_rule_id"];
const BLOCKED_URL_KEYS: &[&str] = &["blocked_url", "url", "cf_site_uri"];
const CATEGORY_KEYS: &[&str] = &["category", "cf_request_category_names"];
const TIMESTAMP_KEYS: &[&str] = &["timestamp"];
const USER_EMAIL_KEYS: &[&str] = &["cf_user_email"];

/// Why the gateway sent the user here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatewayContext {
    pub rule_id: Option<String>,
    pub blocked_url: Option<String>,
    pub category: Option<String>,
    pub timestamp: Option<String>,
    pub user_email: Option<String>,
}

impl GatewayContext {
    /// Parse a raw (still percent-encoded) query string.
    pub fn from_query(query: Option<&str>) -> Self {
        let mut params: HashMap<String, String> = HashMap::new();
        if let Some(query) = query {
            for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
                let value = value.trim();
                if value.is_empty() {
                    continue;
                }
                params
                    .entry(key.into_owned())
                    .or_insert_with(|| value.to_string());
            }
        }

        let pick = |keys: &[&str]| keys.iter().find_map(|k| params.get(*k).cloned());

        Self {
            rule_id: pick(RULE_ID_KEYS),
            blocked_url: pick(BLOCKED_URL_KEYS),
            category: pick(CATEGORY_KEYS),
            timestamp: pick(TIMESTAMP_KEYS),
            user_email: pick(USER_EMAIL_KEYS),
        }
    }

    /// At least one parameter that explains a block is present.
    pub fn is_present(&self) -> bool {
        self.rule_id.is_some()
            || self.blocked_url.is_some()
            || self.category.is_some()
            || self.user_email.is_some()
    }
}

/// Response representation requested by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Html,
    Json,
}

impl ResponseFormat {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let wants_json = headers
            .get_all(ACCEPT)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .any(|v| v.to_ascii_lowercase().contains("application/json"));
        if wants_json {
            ResponseFormat::Json
        } else {
            ResponseFormat::Html
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseFormat::Html => "html",
            ResponseFormat::Json => "json",
        }
    }
}
