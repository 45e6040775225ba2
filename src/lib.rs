//! Gateway block page service.
//!
//! Renders the "access blocked" page a network security gateway redirects
//! users to, resolving the responsible rule's display name through the
//! gateway's REST API with caching and retry.

pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod page;
pub mod resilience;
pub mod resolver;
pub mod rule;
pub mod security;
pub mod upstream;

pub use config::BlockPageConfig;
pub use http::BlockPageServer;
pub use lifecycle::Shutdown;
pub use resolver::RuleNameResolver;
