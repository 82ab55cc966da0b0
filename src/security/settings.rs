//! Resolved per-route security settings.
//!
//! Built once when routes are compiled (see `config::merge`) and shared
//! read-only through an `Arc` by every request on the route.

use crate::security::content_type::ContentTypeSet;
use crate::security::modes::{FrameMode, ReferrerPolicy, XssMode};

/// Independent switches for each conditional step of the policy.
///
/// The defaults give the current behaviour. Flipping them reproduces the
/// earlier variants of the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyGuards {
    /// Also require the nosniff type set for `X-Content-Type-Options`.
    pub nosniff_requires_type: bool,
    /// Require the text type set for `X-XSS-Protection`.
    pub xss_requires_text: bool,
    /// Require the text type set for `X-Frame-Options`.
    pub frame_requires_text: bool,
    /// Skip XSS, frame and referrer headers on `304 Not Modified`.
    pub skip_not_modified: bool,
}

impl Default for PolicyGuards {
    fn default() -> Self {
        Self {
            nosniff_requires_type: false,
            xss_requires_text: true,
            frame_requires_text: true,
            skip_not_modified: true,
        }
    }
}

/// Immutable settings for one route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSecuritySettings {
    pub enable: bool,
    pub xss: XssMode,
    pub frame: FrameMode,
    pub referrer: ReferrerPolicy,
    pub hide_server_tokens: bool,
    pub hsts_preload: bool,
    pub nosniff_types: ContentTypeSet,
    pub text_types: ContentTypeSet,
    pub guards: PolicyGuards,
}

impl Default for RouteSecuritySettings {
    fn default() -> Self {
        Self {
            enable: false,
            xss: XssMode::Block,
            frame: FrameMode::SameOrigin,
            referrer: ReferrerPolicy::StrictOriginWhenCrossOrigin,
            hide_server_tokens: false,
            hsts_preload: true,
            nosniff_types: ContentTypeSet::default_nosniff(),
            text_types: ContentTypeSet::default_text(),
            guards: PolicyGuards::default(),
        }
    }
}
