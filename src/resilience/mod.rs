//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Rule lookup against the gateway API:
//!     → reqwest per-attempt timeout
//!     → On 429/5xx or transport error: retries.rs (classify, check budget)
//!     → backoff.rs (pure attempt → delay schedule)
//!     → tokio::time::sleep, then next attempt
//! ```
//!
//! # Design Decisions
//! - Every external call has a deadline
//! - Policy (delay schedule, classification) is pure and tested apart from I/O
//! - Waiting suspends only the current request's task

pub mod backoff;
pub mod retries;

pub use backoff::backoff_delay;
pub use retries::{classify_status, AttemptBudget, StatusClass};
