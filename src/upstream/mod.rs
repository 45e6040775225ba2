//! Gateway REST API access.
//!
//! # Data Flow
//! ```text
//! rule id
//!     → client.rs (build /accounts/{account}/gateway/rules/{id}, bearer auth)
//!     → resilience (classify status, backoff, retry)
//!     → JSON body → result.name (or "Rule {id}" when absent)
//! ```

pub mod client;

pub use client::{RuleApiClient, UpstreamError};
