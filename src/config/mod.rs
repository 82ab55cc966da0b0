//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → merge.rs (top-level + route security settings → RouteSecuritySettings)
//!     → shared via Arc with the compiled routes
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Security settings use Option per field; None means "inherit"
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod merge;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    GuardsConfig, LimitsConfig, ListenerConfig, ObservabilityConfig, ProxyConfig, RouteConfig,
    SecurityHeadersConfig, TimeoutConfig,
};
