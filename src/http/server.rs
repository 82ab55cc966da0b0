//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the proxy handler
//! - Wire up middleware (tracing, request ID)
//! - Build the response pipeline once at startup
//! - Dispatch requests to the routing engine
//! - Forward requests to upstreams and finalize their responses
//!
//! # Design Decisions
//! - The upstream deadline is enforced inside the handler, so a timed-out
//!   request still gets a finalized 504 instead of a bare middleware response

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{
        uri::{PathAndQuery, Scheme},
        HeaderValue, Request, Response, StatusCode, Uri, Version,
    },
    response::IntoResponse,
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::{ListenerConfig, ProxyConfig};
use crate::headers::HeaderListLimits;
use crate::http::request::{request_id, request_id_layer, RequestIdStage, X_REQUEST_ID};
use crate::http::response::{ResponseFinalizer, ResponseMeta};
use crate::observability::metrics;
use crate::pipeline::ResponsePipeline;
use crate::routing::{Route, Router as ProxyRouter, RouterError};
use crate::security::SecurityHeadersStage;

const X_FORWARDED_PROTO: &str = "x-forwarded-proto";

/// Response as streamed back by the upstream client.
type UpstreamResponse = Response<hyper::body::Incoming>;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ProxyRouter>,
    pub client: Client<HttpConnector, Body>,
    pub finalizer: Arc<ResponseFinalizer>,
    pub listener: ListenerConfig,
    pub request_timeout: Duration,
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, RouterError> {
        let proxy_router = Arc::new(ProxyRouter::from_config(&config)?);

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.timeouts.connect_secs)));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        let pipeline = ResponsePipeline::builder()
            .stage(SecurityHeadersStage)
            .stage(RequestIdStage)
            .build();
        tracing::debug!(stages = ?pipeline.stage_names(), "Response pipeline built");

        let limits = HeaderListLimits {
            part_size: config.limits.header_part_size,
            max_entries: Some(config.limits.max_response_headers),
        };
        let finalizer = Arc::new(ResponseFinalizer::new(
            pipeline,
            limits,
            Some(config.listener.server_token.clone()),
        ));

        let state = AppState {
            router: proxy_router,
            client,
            finalizer,
            listener: config.listener.clone(),
            request_timeout: Duration::from_secs(config.timeouts.request_secs),
        };

        let router = Self::build_router(state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(request_id_layer()),
            )
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            scheme = %self.config.listener.scheme,
            routes = self.config.routes.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Scheme of the request as seen by the client.
fn request_scheme(listener: &ListenerConfig, req: &Request<Body>) -> String {
    if listener.trust_forwarded_proto {
        let forwarded = req
            .headers()
            .get(X_FORWARDED_PROTO)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(|v| v.trim().to_ascii_lowercase())
            .filter(|v| !v.is_empty());
        if let Some(scheme) = forwarded {
            return scheme;
        }
    }
    listener.scheme.clone()
}

/// Main proxy handler.
/// Looks up route, forwards request, and finalizes the response headers.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response<Body> {
    let start_time = Instant::now();
    let request_id = request_id(&request);
    let scheme = request_scheme(&state.listener, &request);
    let path = request.uri().path().to_string();

    tracing::debug!(
        request_id = request_id.as_deref().unwrap_or("unknown"),
        method = %request.method(),
        path = %path,
        scheme = %scheme,
        "Proxying request"
    );

    let (route_name, settings, response) = match state.router.match_request(&request) {
        Some(route) => {
            let response = match tokio::time::timeout(
                state.request_timeout,
                forward(&state, route, request, request_id.as_deref()),
            )
            .await
            {
                Ok(response) => response,
                Err(_) => {
                    tracing::warn!(
                        request_id = request_id.as_deref().unwrap_or("unknown"),
                        route = %route.name,
                        timeout_secs = state.request_timeout.as_secs(),
                        "Upstream timed out"
                    );
                    (StatusCode::GATEWAY_TIMEOUT, "Upstream timed out").into_response()
                }
            };
            (route.name.clone(), route.settings.clone(), response)
        }
        None => {
            tracing::warn!(
                request_id = request_id.as_deref().unwrap_or("unknown"),
                path = %path,
                "No route matched"
            );
            let response = (StatusCode::NOT_FOUND, "No matching route found").into_response();
            ("none".to_string(), state.router.default_settings(), response)
        }
    };

    let response = state.finalizer.finalize(
        response,
        ResponseMeta {
            scheme,
            request_id,
            settings,
        },
    );

    metrics::record_request(&route_name, response.status().as_u16(), start_time);
    response
}

/// Send the request to the route's upstream.
async fn forward(
    state: &AppState,
    route: &Route,
    request: Request<Body>,
    request_id: Option<&str>,
) -> Response<Body> {
    let (mut parts, body) = request.into_parts();

    let path_and_query = parts
        .uri
        .path_and_query()
        .map(PathAndQuery::as_str)
        .unwrap_or("/")
        .to_string();
    let uri = Uri::builder()
        .scheme(Scheme::HTTP)
        .authority(route.upstream.to_string())
        .path_and_query(path_and_query.as_str())
        .build();

    parts.uri = match uri {
        Ok(uri) => uri,
        Err(e) => {
            tracing::error!(route = %route.name, error = %e, "Cannot build upstream URI");
            return (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response();
        }
    };
    parts.version = Version::HTTP_11;

    if let Some(id) = request_id.and_then(|id| HeaderValue::from_str(id).ok()) {
        parts.headers.insert(X_REQUEST_ID, id);
    }

    let upstream: Result<UpstreamResponse, _> =
        state.client.request(Request::from_parts(parts, body)).await;
    match upstream {
        Ok(response) => {
            tracing::debug!(
                route = %route.name,
                upstream = %route.upstream,
                status = %response.status(),
                "Upstream responded"
            );
            response.map(Body::new)
        }
        Err(e) => {
            tracing::error!(
                route = %route.name,
                upstream = %route.upstream,
                error = %e,
                "Upstream error"
            );
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}
