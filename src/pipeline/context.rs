//! Per-response state handed to every stage.

use std::sync::Arc;

use crate::headers::HeaderList;
use crate::security::RouteSecuritySettings;

/// Response metadata plus the header list the stages mutate.
///
/// Everything except `headers` is read-only to stages.
#[derive(Debug, Clone)]
pub struct ResponseContext {
    /// Final response status code.
    pub status: u16,
    /// Request scheme, lower-case (`http` or `https`).
    pub scheme: String,
    /// Response media type without parameters, lower-case. Empty if unknown.
    pub content_type: String,
    /// Request ID assigned on ingress.
    pub request_id: Option<String>,
    /// Resolved settings of the matched route.
    pub settings: Arc<RouteSecuritySettings>,
    /// Headers to be serialized once the pipeline finishes.
    pub headers: HeaderList,
}

impl ResponseContext {
    pub fn new(
        status: u16,
        scheme: impl Into<String>,
        content_type: impl Into<String>,
        settings: Arc<RouteSecuritySettings>,
        headers: HeaderList,
    ) -> Self {
        Self {
            status,
            scheme: scheme.into(),
            content_type: content_type.into(),
            request_id: None,
            settings,
            headers,
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    #[cfg(test)]
    pub(crate) fn for_test(status: u16, scheme: &str, content_type: &str) -> Self {
        Self::new(
            status,
            scheme,
            content_type,
            Arc::new(RouteSecuritySettings::default()),
            HeaderList::new(),
        )
    }
}
