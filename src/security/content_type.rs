//! Content-type match sets.
//!
//! # Design Decisions
//! - Members are stored lower-case; the response media type is expected
//!   already stripped of parameters and lower-cased by the host
//! - `*` as a member matches every type, including an unknown (empty) one

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Types that receive `X-Content-Type-Options` when the nosniff type guard is on.
pub const DEFAULT_NOSNIFF_TYPES: [&str; 3] = ["text/css", "text/javascript", "application/javascript"];

/// Types treated as documents for the frame and XSS guards.
pub const DEFAULT_TEXT_TYPES: [&str; 4] = ["text/html", "application/xhtml+xml", "text/xml", "text/plain"];

const ANY: &str = "*";

/// A set of media types.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ContentTypeSet {
    any: bool,
    types: BTreeSet<String>,
}

impl ContentTypeSet {
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for t in types {
            let t = t.as_ref().trim();
            if t == ANY {
                set.any = true;
            } else if !t.is_empty() {
                set.types.insert(t.to_ascii_lowercase());
            }
        }
        set
    }

    pub fn default_nosniff() -> Self {
        Self::new(DEFAULT_NOSNIFF_TYPES)
    }

    pub fn default_text() -> Self {
        Self::new(DEFAULT_TEXT_TYPES)
    }

    /// Exact membership test.
    pub fn contains(&self, media_type: &str) -> bool {
        self.any || self.types.contains(media_type)
    }

    pub fn len(&self) -> usize {
        self.types.len() + usize::from(self.any)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<String>> for ContentTypeSet {
    fn from(types: Vec<String>) -> Self {
        Self::new(types)
    }
}

impl From<ContentTypeSet> for Vec<String> {
    fn from(set: ContentTypeSet) -> Self {
        let mut out: Vec<String> = set.types.into_iter().collect();
        if set.any {
            out.insert(0, ANY.to_string());
        }
        out
    }
}

/// Reduce a `Content-Type` header value to its bare, lower-case media type.
pub fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
