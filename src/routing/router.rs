//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Compile route configs into matchers and resolved security settings
//! - Look up matching route for request
//! - Return matched route or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan in priority order (acceptable for typical route counts)
//! - Security settings resolved once here, then shared via Arc
//! - Explicit NoMatch rather than silent default

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;

use crate::config::merge::resolve;
use crate::config::{ProxyConfig, RouteConfig, SecurityHeadersConfig};
use crate::routing::matcher::{AndMatcher, HostMatcher, Matcher, PathPrefixMatcher};
use crate::security::RouteSecuritySettings;

/// Error compiling routes.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("route `{route}` has invalid upstream `{upstream}`: {source}")]
    InvalidUpstream {
        route: String,
        upstream: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// A compiled route.
#[derive(Debug)]
pub struct Route {
    pub name: String,
    pub upstream: SocketAddr,
    pub priority: u32,
    pub settings: Arc<RouteSecuritySettings>,
    matcher: AndMatcher,
}

impl Route {
    fn compile(config: &RouteConfig, parent: &SecurityHeadersConfig) -> Result<Self, RouterError> {
        let upstream = config
            .upstream
            .parse()
            .map_err(|source| RouterError::InvalidUpstream {
                route: config.name.clone(),
                upstream: config.upstream.clone(),
                source,
            })?;

        let mut matchers: Vec<Box<dyn Matcher>> = Vec::new();
        if let Some(host) = &config.host {
            matchers.push(Box::new(HostMatcher::new(host.clone())));
        }
        if let Some(prefix) = &config.path_prefix {
            matchers.push(Box::new(PathPrefixMatcher::new(prefix.clone())));
        }

        Ok(Self {
            name: config.name.clone(),
            upstream,
            priority: config.priority,
            settings: Arc::new(resolve(parent, &config.security_headers)),
            matcher: AndMatcher::new(matchers),
        })
    }

    pub fn matches(&self, req: &Request<Body>) -> bool {
        self.matcher.matches(req)
    }
}

/// Immutable route table.
#[derive(Debug)]
pub struct Router {
    routes: Vec<Route>,
    default_settings: Arc<RouteSecuritySettings>,
}

impl Router {
    /// Compile all routes, highest priority first. Equal priorities keep
    /// their config order.
    pub fn from_config(config: &ProxyConfig) -> Result<Self, RouterError> {
        let top = &config.security_headers;
        let mut routes = config
            .routes
            .iter()
            .map(|r| Route::compile(r, top))
            .collect::<Result<Vec<_>, _>>()?;
        routes.sort_by(|a, b| b.priority.cmp(&a.priority));

        for route in &routes {
            tracing::debug!(
                route = %route.name,
                upstream = %route.upstream,
                priority = route.priority,
                security_headers = route.settings.enable,
                "Route compiled"
            );
        }

        Ok(Self {
            routes,
            default_settings: Arc::new(resolve(top, &SecurityHeadersConfig::default())),
        })
    }

    /// First route matching the request.
    pub fn match_request(&self, req: &Request<Body>) -> Option<&Route> {
        self.routes.iter().find(|r| r.matches(req))
    }

    /// Settings for responses that did not match any route.
    pub fn default_settings(&self) -> Arc<RouteSecuritySettings> {
        self.default_settings.clone()
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}
