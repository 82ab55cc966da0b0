//! Security header proxy library.
//!
//! Reverse proxy whose response path runs an explicit pipeline of stages.
//! The central stage adds, overwrites or strips security and fingerprinting
//! headers according to per-route settings.

// Core
pub mod headers;
pub mod pipeline;
pub mod security;

// Host
pub mod config;
pub mod http;
pub mod routing;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
