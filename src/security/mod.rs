//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Outgoing response:
//!     → headers.rs (no-store, nosniff, DENY, nonce-bound CSP for HTML)
//!     → cors.rs (allow-list CORS for JSON and preflight)
//! ```
//!
//! # Design Decisions
//! - Fail closed: unknown origins get `null`, inline code needs the nonce
//! - No trust in client input; all echoed values are escaped in page::markup

pub mod cors;
pub mod headers;

pub use cors::CorsPolicy;
