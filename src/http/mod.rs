//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Gateway redirect (GET ?rule_id=...&blocked_url=...)
//!     → server.rs (Axum setup, request ID, trace, timeout)
//!     → request.rs (gateway context, Accept negotiation)
//!     → resolver (rule id → display name)
//!     → response.rs (403 | JSON + CORS | HTML + CSP nonce)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{GatewayContext, ResponseFormat};
pub use server::{AppState, BlockPageServer};
