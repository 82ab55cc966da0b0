//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::headers::list::DEFAULT_PART_SIZE;
use crate::security::{ContentTypeSet, FrameMode, ReferrerPolicy, XssMode};

/// Root configuration for the proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, scheme).
    pub listener: ListenerConfig,

    /// Top-level security header settings, inherited by every route.
    pub security_headers: SecurityHeadersConfig,

    /// Route definitions mapping requests to upstreams.
    pub routes: Vec<RouteConfig>,

    /// Response header limits.
    pub limits: LimitsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Scheme reported for requests on this listener ("http" or "https").
    /// Set to "https" when a TLS terminator sits in front of the proxy.
    pub scheme: String,

    /// Take the scheme from `X-Forwarded-Proto` when present.
    pub trust_forwarded_proto: bool,

    /// Built-in `Server` header value. Empty disables it.
    pub server_token: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            scheme: "http".to_string(),
            trust_forwarded_proto: false,
            server_token: "header-guard".to_string(),
        }
    }
}

/// Security header settings for one scope.
///
/// Every field is optional: unset fields inherit from the enclosing scope,
/// then fall back to the defaults of `RouteSecuritySettings`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SecurityHeadersConfig {
    pub enable: Option<bool>,
    pub xss: Option<XssMode>,
    pub frame: Option<FrameMode>,
    pub referrer: Option<ReferrerPolicy>,
    pub hide_server_tokens: Option<bool>,
    pub hsts_preload: Option<bool>,
    pub nosniff_types: Option<ContentTypeSet>,
    pub text_types: Option<ContentTypeSet>,
    pub guards: GuardsConfig,
}

/// Optional overrides for the policy guards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuardsConfig {
    pub nosniff_requires_type: Option<bool>,
    pub xss_requires_text: Option<bool>,
    pub frame_requires_text: Option<bool>,
    pub skip_not_modified: Option<bool>,
}

/// Route configuration mapping requests to an upstream.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Route identifier for logging/metrics.
    pub name: String,

    /// Host header to match (exact match, port ignored).
    pub host: Option<String>,

    /// Path prefix to match.
    pub path_prefix: Option<String>,

    /// Upstream address (e.g., "127.0.0.1:3000").
    pub upstream: String,

    /// Route priority (higher = checked first).
    #[serde(default)]
    pub priority: u32,

    /// Route-level overrides of the top-level security settings.
    #[serde(default)]
    pub security_headers: SecurityHeadersConfig,
}

/// Limits on the response header list.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum header entries per response, including suppressed placeholders.
    ///
    /// The upstream block counts toward this, and every stage can add entries
    /// on top of it: up to five suppression placeholders, five security
    /// headers and the request id. The default leaves room for a full
    /// upstream block of 100 headers (the client's parse limit) plus all of
    /// those. A smaller value turns oversized responses into a 500.
    pub max_response_headers: usize,

    /// Entries per header list segment.
    pub header_part_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_response_headers: 128,
            header_part_size: DEFAULT_PART_SIZE,
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Deadline for the upstream response head, in seconds. Expiry yields a 504.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
