//! Response finalisation.
//!
//! # Responsibilities
//! - Load the upstream (or locally generated) response headers into a list
//! - Run the response pipeline over them
//! - Serialize the result, adding the built-in `Server` token
//! - Turn a pipeline failure into a 500
//!
//! # Design Decisions
//! - The body is never touched; only the header block is rebuilt
//! - No partial rollback: a failed pipeline discards the whole header block

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Response, StatusCode},
    response::IntoResponse,
};

use crate::headers::{HeaderList, HeaderListLimits};
use crate::observability::metrics;
use crate::pipeline::{ResponseContext, ResponsePipeline};
use crate::security::content_type::media_type;
use crate::security::RouteSecuritySettings;

/// Request-side facts the pipeline needs about a response.
#[derive(Debug, Clone)]
pub struct ResponseMeta {
    pub scheme: String,
    pub request_id: Option<String>,
    pub settings: Arc<RouteSecuritySettings>,
}

/// Runs the response pipeline and rebuilds the header block.
pub struct ResponseFinalizer {
    pipeline: ResponsePipeline,
    limits: HeaderListLimits,
    server_token: Option<String>,
}

impl ResponseFinalizer {
    pub fn new(pipeline: ResponsePipeline, limits: HeaderListLimits, server_token: Option<String>) -> Self {
        Self {
            pipeline,
            limits,
            server_token: server_token.filter(|t| !t.is_empty()),
        }
    }

    pub fn pipeline(&self) -> &ResponsePipeline {
        &self.pipeline
    }

    /// Apply the pipeline to `response`.
    pub fn finalize(&self, response: Response<Body>, meta: ResponseMeta) -> Response<Body> {
        let (mut parts, body) = response.into_parts();

        let content_type = parts
            .headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(media_type)
            .unwrap_or_default();

        let headers = match HeaderList::from_header_map(&parts.headers, self.limits) {
            Ok(h) => h,
            Err(e) => {
                tracing::error!(error = %e, "Cannot load response headers");
                metrics::record_stage_failure("load-headers");
                return internal_error();
            }
        };

        let mut ctx = ResponseContext::new(
            parts.status.as_u16(),
            meta.scheme,
            content_type,
            meta.settings,
            headers,
        );
        ctx.request_id = meta.request_id;

        if let Err(e) = self.pipeline.run(&mut ctx) {
            tracing::error!(
                request_id = ctx.request_id.as_deref().unwrap_or("unknown"),
                stage = e.stage(),
                error = %e,
                "Response pipeline failed"
            );
            metrics::record_stage_failure(e.stage());
            return internal_error();
        }

        parts.headers = ctx.headers.to_header_map(self.server_token.as_deref());
        Response::from_parts(parts, body)
    }
}

fn internal_error() -> Response<Body> {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}
