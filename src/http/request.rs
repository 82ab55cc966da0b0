//! Request ID assignment and echo.
//!
//! # Responsibilities
//! - Generate a UUID v4 request ID when the client did not send one
//! - Forward the ID to the upstream
//! - Echo the ID on the response as a pipeline stage
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - A client-supplied `x-request-id` is kept as-is

use axum::http::{HeaderName, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId, SetRequestIdLayer};

use crate::headers::set_or_clear;
use crate::pipeline::{Next, ResponseContext, ResponseStage, StageError};

pub const X_REQUEST_ID: &str = "x-request-id";

/// Produces UUID v4 request IDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = uuid::Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Layer that assigns `x-request-id` on ingress.
pub fn request_id_layer() -> SetRequestIdLayer<UuidRequestId> {
    SetRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID), UuidRequestId)
}

/// Read the request ID assigned by [`request_id_layer`].
pub fn request_id<B>(req: &Request<B>) -> Option<String> {
    req.headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Writes the request ID onto the response.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdStage;

impl ResponseStage for RequestIdStage {
    fn name(&self) -> &'static str {
        "request-id"
    }

    fn on_response(&self, ctx: &mut ResponseContext, next: Next<'_>) -> Result<(), StageError> {
        if let Some(id) = ctx.request_id.clone() {
            set_or_clear(&mut ctx.headers, X_REQUEST_ID, &id)
                .map_err(|e| StageError::headers(self.name(), e))?;
        }
        next.run(ctx)
    }
}
