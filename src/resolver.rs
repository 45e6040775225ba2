//! Rule name resolution.
//!
//! # Data Flow
//! ```text
//! rule id (untrusted, maybe absent)
//!     → absent        → "Security Policy"
//!     → cache hit     → cached name
//!     → no creds      → "Rule {id}"
//!     → gateway API   → name (cached with TTL) | "Rule {id}" on failure
//! ```
//!
//! Resolution never fails outward: every error path degrades to a placeholder.

use crate::cache::RuleCache;
use crate::observability::metrics;
use crate::rule::{normalize_rule_id, placeholder_name, UNSPECIFIED_RULE_LABEL};
use crate::upstream::RuleApiClient;

/// Resolves rule identifiers to display names through the cache and, when
/// credentials are configured, the gateway API.
#[derive(Clone)]
pub struct RuleNameResolver {
    cache: RuleCache,
    api: Option<RuleApiClient>,
}

impl RuleNameResolver {
    /// `api` is `None` in deployments without an API token and account id.
    pub fn new(cache: RuleCache, api: Option<RuleApiClient>) -> Self {
        Self { cache, api }
    }

    pub fn has_credentials(&self) -> bool {
        self.api.is_some()
    }

    /// Display name for `rule_id`. Always non-empty.
    pub async fn resolve(&self, rule_id: Option<&str>) -> String {
        let Some(rule_id) = normalize_rule_id(rule_id) else {
            metrics::record_lookup("empty");
            return UNSPECIFIED_RULE_LABEL.to_string();
        };

        if let Some(name) = self.cache.get(rule_id).await {
            tracing::debug!(rule_id = %rule_id, "Rule name cache hit");
            metrics::record_lookup("cache_hit");
            return name;
        }

        let Some(api) = &self.api else {
            tracing::debug!(rule_id = %rule_id, "No API credentials configured, using placeholder");
            metrics::record_lookup("unconfigured");
            return placeholder_name(rule_id);
        };

        match api.fetch_rule_name(rule_id).await {
            Ok(name) => {
                self.cache.put(rule_id, &name).await;
                metrics::record_lookup("upstream");
                name
            }
            Err(e) => {
                tracing::warn!(rule_id = %rule_id, error = %e, "Rule lookup failed, using placeholder");
                metrics::record_lookup("fallback");
                placeholder_name(rule_id)
            }
        }
    }
}
