//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, schemes and value ranges
//! - Check content-type set members
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use crate::config::schema::{ProxyConfig, SecurityHeadersConfig};
use crate::security::ContentTypeSet;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid bind address `{0}`")]
    BindAddress(String),

    #[error("unsupported listener scheme `{0}` (expected http or https)")]
    Scheme(String),

    #[error("route #{0} has an empty name")]
    EmptyRouteName(usize),

    #[error("duplicate route name `{0}`")]
    DuplicateRoute(String),

    #[error("route `{route}` has invalid upstream `{upstream}`")]
    Upstream { route: String, upstream: String },

    #[error("{scope}: invalid content type `{value}`")]
    ContentType { scope: String, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Validate the whole configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }
    if !matches!(config.listener.scheme.as_str(), "http" | "https") {
        errors.push(ValidationError::Scheme(config.listener.scheme.clone()));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    if config.limits.max_response_headers == 0 {
        errors.push(ValidationError::Zero("limits.max_response_headers"));
    }
    if config.limits.header_part_size == 0 {
        errors.push(ValidationError::Zero("limits.header_part_size"));
    }

    check_security("security_headers", &config.security_headers, &mut errors);

    let mut seen = HashSet::new();
    for (i, route) in config.routes.iter().enumerate() {
        if route.name.trim().is_empty() {
            errors.push(ValidationError::EmptyRouteName(i));
        } else if !seen.insert(route.name.as_str()) {
            errors.push(ValidationError::DuplicateRoute(route.name.clone()));
        }

        if route.upstream.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::Upstream {
                route: route.name.clone(),
                upstream: route.upstream.clone(),
            });
        }

        let scope = format!("routes.{}.security_headers", route.name);
        check_security(&scope, &route.security_headers, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_security(scope: &str, config: &SecurityHeadersConfig, errors: &mut Vec<ValidationError>) {
    for set in [&config.nosniff_types, &config.text_types].into_iter().flatten() {
        check_types(scope, set, errors);
    }
}

fn check_types(scope: &str, set: &ContentTypeSet, errors: &mut Vec<ValidationError>) {
    for value in Vec::<String>::from(set.clone()) {
        if value != "*" && !value.contains('/') {
            errors.push(ValidationError::ContentType {
                scope: scope.to_string(),
                value,
            });
        }
    }
}
