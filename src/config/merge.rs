//! Scope inheritance for security header settings.
//!
//! # Design Decisions
//! - Pure functions: no config is mutated in place
//! - Explicit child value wins, then parent, then the documented default
//! - Resolution runs once per route at startup

use crate::config::schema::{GuardsConfig, SecurityHeadersConfig};
use crate::security::{PolicyGuards, RouteSecuritySettings};

/// Overlay `child` on `parent`. The result can be merged again, so any
/// number of nested scopes can be folded.
pub fn merge(parent: &SecurityHeadersConfig, child: &SecurityHeadersConfig) -> SecurityHeadersConfig {
    SecurityHeadersConfig {
        enable: child.enable.or(parent.enable),
        xss: child.xss.or(parent.xss),
        frame: child.frame.or(parent.frame),
        referrer: child.referrer.or(parent.referrer),
        hide_server_tokens: child.hide_server_tokens.or(parent.hide_server_tokens),
        hsts_preload: child.hsts_preload.or(parent.hsts_preload),
        nosniff_types: child
            .nosniff_types
            .clone()
            .or_else(|| parent.nosniff_types.clone()),
        text_types: child.text_types.clone().or_else(|| parent.text_types.clone()),
        guards: merge_guards(&parent.guards, &child.guards),
    }
}

fn merge_guards(parent: &GuardsConfig, child: &GuardsConfig) -> GuardsConfig {
    GuardsConfig {
        nosniff_requires_type: child.nosniff_requires_type.or(parent.nosniff_requires_type),
        xss_requires_text: child.xss_requires_text.or(parent.xss_requires_text),
        frame_requires_text: child.frame_requires_text.or(parent.frame_requires_text),
        skip_not_modified: child.skip_not_modified.or(parent.skip_not_modified),
    }
}

/// Fill every unset field with its default.
pub fn finalize(config: &SecurityHeadersConfig) -> RouteSecuritySettings {
    let defaults = RouteSecuritySettings::default();
    let guards = PolicyGuards::default();

    RouteSecuritySettings {
        enable: config.enable.unwrap_or(defaults.enable),
        xss: config.xss.unwrap_or(defaults.xss),
        frame: config.frame.unwrap_or(defaults.frame),
        referrer: config.referrer.unwrap_or(defaults.referrer),
        hide_server_tokens: config.hide_server_tokens.unwrap_or(defaults.hide_server_tokens),
        hsts_preload: config.hsts_preload.unwrap_or(defaults.hsts_preload),
        nosniff_types: config.nosniff_types.clone().unwrap_or(defaults.nosniff_types),
        text_types: config.text_types.clone().unwrap_or(defaults.text_types),
        guards: PolicyGuards {
            nosniff_requires_type: config
                .guards
                .nosniff_requires_type
                .unwrap_or(guards.nosniff_requires_type),
            xss_requires_text: config.guards.xss_requires_text.unwrap_or(guards.xss_requires_text),
            frame_requires_text: config
                .guards
                .frame_requires_text
                .unwrap_or(guards.frame_requires_text),
            skip_not_modified: config.guards.skip_not_modified.unwrap_or(guards.skip_not_modified),
        },
    }
}

/// Merge `child` into `parent` and resolve the result.
pub fn resolve(parent: &SecurityHeadersConfig, child: &SecurityHeadersConfig) -> RouteSecuritySettings {
    finalize(&merge(parent, child))
}
