//! Retry classification for upstream responses.
//!
//! # Responsibilities
//! - Decide whether a response status is worth another attempt
//! - Track how many attempts a lookup may still make
//!
//! # Design Decisions
//! - 429 and any 5xx are transient; every other non-success is final
//! - Transport errors are always retryable (same schedule as statuses)

use reqwest::StatusCode;

/// What to do with an upstream response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Success,
    Retryable,
    Fatal,
}

/// Classify an upstream status code.
pub fn classify_status(status: StatusCode) -> StatusClass {
    if status.is_success() {
        StatusClass::Success
    } else if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        StatusClass::Retryable
    } else {
        StatusClass::Fatal
    }
}

/// Attempt budget for one lookup: the first attempt plus `max_retries`.
#[derive(Debug, Clone, Copy)]
pub struct AttemptBudget {
    max_retries: u32,
}

impl AttemptBudget {
    pub fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }

    /// Total attempts allowed.
    pub fn total(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Whether another attempt may follow attempt `attempt` (0-indexed).
    pub fn has_retry_after(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }
}
