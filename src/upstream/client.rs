//! Gateway rule lookup client with bounded exponential-backoff retry.
//!
//! # Responsibilities
//! - Issue one authenticated GET per attempt
//! - Retry 429/5xx responses and transport errors with backoff
//! - Fail fast on any other non-success status
//! - Give up once the whole lookup exceeds its deadline
//! - Extract `result.name` from the JSON body

use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::config::{Credentials, RetryConfig, UpstreamConfig};
use crate::observability::metrics;
use crate::resilience::{backoff_delay, classify_status, AttemptBudget, StatusClass};
use crate::rule::placeholder_name;

/// Errors from a rule lookup.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Retryable status still returned when the attempt budget ran out.
    #[error("gateway API returned {status} after {attempts} attempt(s)")]
    Exhausted { status: StatusCode, attempts: u32 },

    /// Non-retryable status.
    #[error("gateway API rejected the lookup with {0}")]
    Rejected(StatusCode),

    /// Connection, timeout or body read failure (last one, if retried).
    #[error("gateway API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Success status but the body is not JSON.
    #[error("gateway API returned a malformed body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The lookup as a whole, retries included, ran past its deadline.
    #[error("gateway API lookup exceeded its {0:?} deadline")]
    DeadlineExceeded(Duration),

    #[error("invalid gateway API URL: {0}")]
    InvalidUrl(String),
}

/// Client for `GET /accounts/{account}/gateway/rules/{rule}`.
#[derive(Clone)]
pub struct RuleApiClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
    budget: AttemptBudget,
    base_delay: Duration,
    deadline: Duration,
}

impl RuleApiClient {
    pub fn new(
        upstream: &UpstreamConfig,
        credentials: Credentials,
        retries: &RetryConfig,
    ) -> Result<Self, UpstreamError> {
        let base_url = Url::parse(&upstream.api_base_url)
            .map_err(|e| UpstreamError::InvalidUrl(format!("{}: {}", upstream.api_base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::InvalidUrl(upstream.api_base_url.clone()));
        }

        let mut builder = reqwest::Client::builder()
            .timeout(upstream.request_timeout())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));
        if !upstream.system_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
            credentials,
            budget: AttemptBudget::new(retries.max_retries),
            base_delay: Duration::from_millis(retries.base_delay_ms),
            deadline: upstream.lookup_deadline(),
        })
    }

    /// Lookup URL for `rule_id`. The id is percent-encoded as one path segment.
    pub fn rule_url(&self, rule_id: &str) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend([
                "accounts",
                self.credentials.account_id.as_str(),
                "gateway",
                "rules",
                rule_id,
            ]);
        Ok(url)
    }

    /// Fetch the display name for `rule_id`, retrying transient failures
    /// until the attempt budget or the lookup deadline runs out.
    pub async fn fetch_rule_name(&self, rule_id: &str) -> Result<String, UpstreamError> {
        match tokio::time::timeout(self.deadline, self.fetch_with_retries(rule_id)).await {
            Ok(result) => result,
            Err(_) => {
                metrics::record_upstream_attempt("deadline");
                tracing::warn!(
                    rule_id = %rule_id,
                    deadline = ?self.deadline,
                    "Rule lookup deadline exceeded"
                );
                Err(UpstreamError::DeadlineExceeded(self.deadline))
            }
        }
    }

    async fn fetch_with_retries(&self, rule_id: &str) -> Result<String, UpstreamError> {
        let url = self.rule_url(rule_id)?;
        let mut attempt = 0u32;

        loop {
            let retryable = match self
                .http
                .get(url.clone())
                .bearer_auth(&self.credentials.api_token)
                .header(ACCEPT, "application/json")
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    match classify_status(status) {
                        StatusClass::Success => match response.bytes().await {
                            Ok(body) => {
                                metrics::record_upstream_attempt("success");
                                return extract_rule_name(&body, rule_id);
                            }
                            Err(e) => UpstreamError::Transport(e),
                        },
                        StatusClass::Retryable => UpstreamError::Exhausted {
                            status,
                            attempts: attempt + 1,
                        },
                        StatusClass::Fatal => {
                            metrics::record_upstream_attempt("rejected");
                            return Err(UpstreamError::Rejected(status));
                        }
                    }
                }
                Err(e) => UpstreamError::Transport(e),
            };

            metrics::record_upstream_attempt("retryable");

            if !self.budget.has_retry_after(attempt) {
                tracing::warn!(
                    rule_id = %rule_id,
                    attempts = self.budget.total(),
                    error = %retryable,
                    "Rule lookup retries exhausted"
                );
                return Err(retryable);
            }

            let delay = backoff_delay(attempt, self.base_delay);
            tracing::info!(
                rule_id = %rule_id,
                attempt = attempt,
                delay = ?delay,
                error = %retryable,
                "Retrying rule lookup"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

/// Pull `result.name` out of a lookup body, falling back to the placeholder
/// for the requested rule when the name is missing or blank.
fn extract_rule_name(body: &[u8], rule_id: &str) -> Result<String, UpstreamError> {
    let payload: Value = serde_json::from_slice(body)?;
    let name = payload
        .pointer("/result/name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty());

    Ok(match name {
        Some(name) => name.to_string(),
        None => placeholder_name(rule_id),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> RuleApiClient {
        let upstream = UpstreamConfig {
            api_base_url: base.to_string(),
            ..Default::default()
        };
        let credentials = Credentials {
            api_token: "t".into(),
            account_id: "acc 1".into(),
        };
        RuleApiClient::new(&upstream, credentials, &RetryConfig::default()).unwrap()
    }

    #[test]
    fn test_rule_url() {
        let c = client("https://api.example.com/client/v4");
        assert_eq!(
            c.rule_url("r-1").unwrap().as_str(),
            "https://api.example.com/client/v4/accounts/acc%201/gateway/rules/r-1"
        );

        let trailing = client("https://api.example.com/client/v4/");
        assert_eq!(
            trailing.rule_url("r-1").unwrap().as_str(),
            "https://api.example.com/client/v4/accounts/acc%201/gateway/rules/r-1"
        );
    }

    #[test]
    fn test_rule_id_cannot_escape_path() {
        let c = client("https://api.example.com/client/v4");
        let url = c.rule_url("../../users?x=1#frag").unwrap();
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
        assert!(url.path().starts_with("/client/v4/accounts/acc%201/gateway/rules/"));
        assert!(!url.path().ends_with("/users"));
    }

    #[test]
    fn test_extract_rule_name() {
        let body = br#"{"success":true,"result":{"id":"r1","name":"Block Social Media"}}"#;
        assert_eq!(extract_rule_name(body, "r1").unwrap(), "Block Social Media");
    }

    #[test]
    fn test_extract_falls_back_without_name() {
        assert_eq!(extract_rule_name(br#"{"result":{}}"#, "r1").unwrap(), "Rule r1");
        assert_eq!(extract_rule_name(br#"{"result":{"name":"  "}}"#, "r1").unwrap(), "Rule r1");
        assert_eq!(extract_rule_name(br#"{"result":{"name":7}}"#, "r1").unwrap(), "Rule r1");
        assert_eq!(extract_rule_name(br#"[]"#, "r1").unwrap(), "Rule r1");
    }

    #[test]
    fn test_extract_rejects_non_json() {
        let err = extract_rule_name(b"<html>oops</html>", "r1").unwrap_err();
        assert!(matches!(err, UpstreamError::Decode(_)));
    }

    #[test]
    fn test_error_display() {
        let err = UpstreamError::Exhausted {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            attempts: 4,
        };
        assert_eq!(
            err.to_string(),
            "gateway API returned 500 Internal Server Error after 4 attempt(s)"
        );
    }

    #[tokio::test]
    async fn test_hanging_upstream_hits_deadline() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let upstream = UpstreamConfig {
            api_base_url: format!("http://{}/client/v4", addr),
            request_timeout_secs: 10,
            lookup_deadline_secs: 1,
            system_proxy: false,
            ..Default::default()
        };
        let credentials = Credentials {
            api_token: "t".into(),
            account_id: "acc".into(),
        };
        let c = RuleApiClient::new(&upstream, credentials, &RetryConfig::default()).unwrap();

        let started = std::time::Instant::now();
        let err = c.fetch_rule_name("r1").await.unwrap_err();
        assert!(matches!(err, UpstreamError::DeadlineExceeded(d) if d == Duration::from_secs(1)));
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
