//! Header modes selectable per route.

use std::fmt;

use serde::{Deserialize, Serialize};

/// `X-XSS-Protection` mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum XssMode {
    Omit,
    Off,
    On,
    Block,
}

impl XssMode {
    /// Header value, or `None` when the header is omitted.
    pub fn header_value(self) -> Option<&'static str> {
        match self {
            XssMode::Omit => None,
            XssMode::Off => Some("0"),
            XssMode::On => Some("1"),
            XssMode::Block => Some("1; mode=block"),
        }
    }
}

/// `X-Frame-Options` mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameMode {
    Omit,
    SameOrigin,
    Deny,
}

impl FrameMode {
    pub fn header_value(self) -> Option<&'static str> {
        match self {
            FrameMode::Omit => None,
            FrameMode::SameOrigin => Some("SAMEORIGIN"),
            FrameMode::Deny => Some("DENY"),
        }
    }
}

/// `Referrer-Policy` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferrerPolicy {
    Omit,
    NoReferrer,
    NoReferrerWhenDowngrade,
    SameOrigin,
    Origin,
    StrictOrigin,
    OriginWhenCrossOrigin,
    StrictOriginWhenCrossOrigin,
    UnsafeUrl,
}

impl ReferrerPolicy {
    pub fn header_value(self) -> Option<&'static str> {
        Some(match self {
            ReferrerPolicy::Omit => return None,
            ReferrerPolicy::NoReferrer => "no-referrer",
            ReferrerPolicy::NoReferrerWhenDowngrade => "no-referrer-when-downgrade",
            ReferrerPolicy::SameOrigin => "same-origin",
            ReferrerPolicy::Origin => "origin",
            ReferrerPolicy::StrictOrigin => "strict-origin",
            ReferrerPolicy::OriginWhenCrossOrigin => "origin-when-cross-origin",
            ReferrerPolicy::StrictOriginWhenCrossOrigin => "strict-origin-when-cross-origin",
            ReferrerPolicy::UnsafeUrl => "unsafe-url",
        })
    }
}

impl fmt::Display for ReferrerPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header_value().unwrap_or("omit"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Modes {
        xss: XssMode,
        frame: FrameMode,
        referrer: ReferrerPolicy,
    }

    #[test]
    fn parses_directive_names() {
        let m: Modes = toml::from_str(
            r#"
            xss = "block"
            frame = "sameorigin"
            referrer = "no-referrer-when-downgrade"
            "#,
        )
        .unwrap();
        assert_eq!(m.xss, XssMode::Block);
        assert_eq!(m.frame, FrameMode::SameOrigin);
        assert_eq!(m.referrer, ReferrerPolicy::NoReferrerWhenDowngrade);
    }

    #[test]
    fn rejects_unknown_mode() {
        let res: Result<Modes, _> = toml::from_str(
            r#"
            xss = "maybe"
            frame = "deny"
            referrer = "origin"
            "#,
        );
        assert!(res.is_err());
    }

    #[test]
    fn xss_header_values() {
        let cases = [
            (XssMode::Omit, None),
            (XssMode::Off, Some("0")),
            (XssMode::On, Some("1")),
            (XssMode::Block, Some("1; mode=block")),
        ];
        for (mode, expected) in cases {
            assert_eq!(mode.header_value(), expected, "{mode:?}");
        }
    }

    #[test]
    fn frame_header_values() {
        let cases = [
            (FrameMode::Omit, None),
            (FrameMode::SameOrigin, Some("SAMEORIGIN")),
            (FrameMode::Deny, Some("DENY")),
        ];
        for (mode, expected) in cases {
            assert_eq!(mode.header_value(), expected, "{mode:?}");
        }
    }

    #[test]
    fn referrer_header_values() {
        let cases = [
            (ReferrerPolicy::Omit, None),
            (ReferrerPolicy::NoReferrer, Some("no-referrer")),
            (ReferrerPolicy::NoReferrerWhenDowngrade, Some("no-referrer-when-downgrade")),
            (ReferrerPolicy::SameOrigin, Some("same-origin")),
            (ReferrerPolicy::Origin, Some("origin")),
            (ReferrerPolicy::StrictOrigin, Some("strict-origin")),
            (ReferrerPolicy::OriginWhenCrossOrigin, Some("origin-when-cross-origin")),
            (
                ReferrerPolicy::StrictOriginWhenCrossOrigin,
                Some("strict-origin-when-cross-origin"),
            ),
            (ReferrerPolicy::UnsafeUrl, Some("unsafe-url")),
        ];
        for (policy, expected) in cases {
            assert_eq!(policy.header_value(), expected, "{policy:?}");
            assert_eq!(policy.to_string(), expected.unwrap_or("omit"));
        }
    }
}
