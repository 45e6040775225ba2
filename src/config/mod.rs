//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (API_TOKEN, ACCOUNT_ID, CACHE_TTL, ...)
//!     → validation.rs (semantic checks)
//!     → BlockPageConfig (validated, immutable)
//!     → handed by reference to each subsystem at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_config_with, ConfigError};
pub use schema::{
    BlockPageConfig, CacheConfig, CorsConfig, Credentials, ListenerConfig, ObservabilityConfig,
    PageConfig, RetryConfig, UpstreamConfig,
};
