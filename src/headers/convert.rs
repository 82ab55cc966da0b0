//! Conversion between `http::HeaderMap` and [`HeaderList`].
//!
//! # Responsibilities
//! - Load upstream response headers into a list, keeping order and duplicates
//! - Serialize active entries back into a `HeaderMap`
//! - Emit the built-in `Server` header unless the list holds a `server` entry
//!
//! # Design Decisions
//! - Inactive entries are never serialized
//! - A present-but-inactive `server` entry suppresses the built-in token;
//!   mere absence does not
//! - Values are copied as raw bytes; headers the stages never write leave
//!   byte-for-byte as they arrived
//! - Entries that are not valid HTTP names or values are dropped with a warning

use axum::http::{
    header::{HeaderName, HeaderValue, SERVER},
    HeaderMap,
};

use crate::headers::list::{HeaderEntry, HeaderError, HeaderList, HeaderListLimits};

impl HeaderList {
    /// Build a list from an upstream `HeaderMap`.
    pub fn from_header_map(map: &HeaderMap, limits: HeaderListLimits) -> Result<Self, HeaderError> {
        let mut list = HeaderList::with_limits(limits);

        for (name, value) in map.iter() {
            list.push(HeaderEntry::new(name.as_str(), value.as_bytes()))?;
        }

        Ok(list)
    }

    /// Serialize active entries into a `HeaderMap`.
    ///
    /// `server_token` is the host's built-in `Server` value; it is added only
    /// when no entry named `server` exists at all.
    pub fn to_header_map(&self, server_token: Option<&str>) -> HeaderMap {
        let mut map = HeaderMap::with_capacity(self.len());

        for entry in self.active() {
            let name = match HeaderName::from_bytes(entry.name().as_bytes()) {
                Ok(n) => n,
                Err(_) => {
                    tracing::warn!(header = %entry.name(), "Dropping header with invalid name");
                    continue;
                }
            };
            let value = match HeaderValue::from_bytes(entry.value()) {
                Ok(v) => v,
                Err(_) => {
                    tracing::warn!(header = %entry.name(), "Dropping header with invalid value");
                    continue;
                }
            };
            map.append(name, value);
        }

        if let Some(token) = server_token.filter(|t| !t.is_empty()) {
            if !self.contains_any(SERVER.as_str()) {
                match HeaderValue::from_str(token) {
                    Ok(v) => {
                        map.insert(SERVER, v);
                    }
                    Err(_) => tracing::warn!(token = %token, "Invalid server token"),
                }
            }
        }

        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::mutate::set_or_clear;

    #[test]
    fn from_header_map_keeps_duplicates_in_order() {
        let mut map = HeaderMap::new();
        map.append("set-cookie", HeaderValue::from_static("a=1"));
        map.append("set-cookie", HeaderValue::from_static("b=2"));
        map.insert("content-type", HeaderValue::from_static("text/html"));

        let list = HeaderList::from_header_map(&map, HeaderListLimits::default()).unwrap();

        let cookies: Vec<_> = list
            .iter()
            .filter(|e| e.lowcase_name() == "set-cookie")
            .filter_map(|e| e.value_str())
            .collect();
        assert_eq!(cookies, ["a=1", "b=2"]);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn from_header_map_honours_limit() {
        let mut map = HeaderMap::new();
        map.insert("a", HeaderValue::from_static("1"));
        map.insert("b", HeaderValue::from_static("2"));

        let limits = HeaderListLimits {
            max_entries: Some(1),
            ..HeaderListLimits::default()
        };
        assert!(HeaderList::from_header_map(&map, limits).is_err());
    }

    #[test]
    fn opaque_values_round_trip_unchanged() {
        let latin1 = HeaderValue::from_bytes(b"attachment; filename=caf\xe9.txt").unwrap();
        let mut map = HeaderMap::new();
        map.insert("content-disposition", latin1.clone());
        map.insert("x-legacy", HeaderValue::from_bytes(b"caf\xe9").unwrap());

        let mut list = HeaderList::from_header_map(&map, HeaderListLimits::default()).unwrap();
        set_or_clear(&mut list, "X-Frame-Options", "DENY").unwrap();
        let out = list.to_header_map(None);

        assert_eq!(out.get("content-disposition"), Some(&latin1));
        assert_eq!(out.get("x-legacy").unwrap().as_bytes(), b"caf\xe9");
        assert_eq!(out.get("x-frame-options").unwrap(), "DENY");
    }

    #[test]
    fn builtin_server_token_added_when_absent() {
        let list = HeaderList::new();
        let map = list.to_header_map(Some("header-guard"));
        assert_eq!(map.get(SERVER).unwrap(), "header-guard");
    }

    #[test]
    fn inactive_server_placeholder_suppresses_token() {
        let mut list = HeaderList::new();
        set_or_clear(&mut list, "server", "").unwrap();

        let map = list.to_header_map(Some("header-guard"));
        assert!(map.get(SERVER).is_none());
    }

    #[test]
    fn upstream_server_header_kept() {
        let mut list = HeaderList::new();
        list.push(HeaderEntry::new("Server", "upstream/1.0")).unwrap();

        let map = list.to_header_map(Some("header-guard"));
        assert_eq!(map.get_all(SERVER).iter().count(), 1);
        assert_eq!(map.get(SERVER).unwrap(), "upstream/1.0");
    }

    #[test]
    fn inactive_entries_are_not_serialized() {
        let mut list = HeaderList::new();
        list.push(HeaderEntry::new("X-Powered-By", "PHP/8")).unwrap();
        list.push(HeaderEntry::new("Vary", "Accept")).unwrap();
        set_or_clear(&mut list, "x-powered-by", "").unwrap();

        let map = list.to_header_map(None);
        assert!(map.get("x-powered-by").is_none());
        assert_eq!(map.get("vary").unwrap(), "Accept");
        assert_eq!(map.len(), 1);
    }
}
