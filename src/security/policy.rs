//! Security header policy.
//!
//! Decides which headers a response receives from its route settings and
//! metadata, and writes them through `set_or_clear`. Steps run in a fixed
//! order:
//!
//! 1. hide server tokens (independent of `enable`)
//! 2. stop if `enable` is off
//! 3. `X-Content-Type-Options` on 200
//! 4. `X-XSS-Protection`
//! 5. `Strict-Transport-Security` on https
//! 6. `X-Frame-Options`
//! 7. `Referrer-Policy`
//!
//! The first failing write aborts the remaining steps. Headers written by
//! earlier steps stay in place.

use crate::headers::{set_or_clear, HeaderError, HeaderList};
use crate::pipeline::ResponseContext;
use crate::security::settings::RouteSecuritySettings;

pub const SERVER_HEADER: &str = "server";

/// Fingerprinting headers cleared alongside the server identity.
pub const FINGERPRINT_HEADERS: [&str; 4] = [
    "x-powered-by",
    "x-page-speed",
    "x-varnish",
    "x-application-version",
];

pub const HSTS_VALUE: &str = "max-age=63072000; includeSubDomains";
pub const HSTS_PRELOAD_VALUE: &str = "max-age=63072000; includeSubDomains; preload";

const STATUS_OK: u16 = 200;
const STATUS_NOT_MODIFIED: u16 = 304;

/// Counts of what the policy wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolicyReport {
    /// Headers set to a value.
    pub set: usize,
    /// Headers cleared or suppressed.
    pub suppressed: usize,
    /// Duplicate entries deactivated along the way.
    pub collapsed: usize,
}

struct Writer<'a> {
    headers: &'a mut HeaderList,
    report: PolicyReport,
}

impl Writer<'_> {
    fn write(&mut self, name: &str, value: &str) -> Result<(), HeaderError> {
        let mutation = set_or_clear(self.headers, name, value)?;
        if value.is_empty() {
            self.report.suppressed += 1;
        } else {
            self.report.set += 1;
        }
        self.report.collapsed += mutation.collapsed;
        tracing::debug!(header = %name, value = %value, "Security header applied");
        Ok(())
    }
}

/// Apply `settings` to the response in `ctx`.
pub fn apply(settings: &RouteSecuritySettings, ctx: &mut ResponseContext) -> Result<PolicyReport, HeaderError> {
    let status = ctx.status;
    let is_https = ctx.scheme == "https";
    let is_text = |guard: bool| !guard || settings.text_types.contains(&ctx.content_type);
    let xss_allowed = is_text(settings.guards.xss_requires_text);
    let frame_allowed = is_text(settings.guards.frame_requires_text);
    let nosniff_allowed =
        !settings.guards.nosniff_requires_type || settings.nosniff_types.contains(&ctx.content_type);
    let not_modified = settings.guards.skip_not_modified && status == STATUS_NOT_MODIFIED;

    let mut w = Writer {
        headers: &mut ctx.headers,
        report: PolicyReport::default(),
    };

    if settings.hide_server_tokens {
        w.write(SERVER_HEADER, "")?;
        for name in FINGERPRINT_HEADERS {
            w.write(name, "")?;
        }
    }

    if !settings.enable {
        return Ok(w.report);
    }

    if status == STATUS_OK && nosniff_allowed {
        w.write("X-Content-Type-Options", "nosniff")?;
    }

    if !not_modified && xss_allowed {
        if let Some(value) = settings.xss.header_value() {
            w.write("X-XSS-Protection", value)?;
        }
    }

    if is_https {
        let value = if settings.hsts_preload {
            HSTS_PRELOAD_VALUE
        } else {
            HSTS_VALUE
        };
        w.write("Strict-Transport-Security", value)?;
    }

    if !not_modified && frame_allowed {
        if let Some(value) = settings.frame.header_value() {
            w.write("X-Frame-Options", value)?;
        }
    }

    if !not_modified {
        if let Some(value) = settings.referrer.header_value() {
            w.write("Referrer-Policy", value)?;
        }
    }

    Ok(w.report)
}
