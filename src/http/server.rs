//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router and wire up middleware (tracing, request ID,
//!   rate limiting, timeout)
//! - Extract the alias from the first request path segment
//! - Buffer the inbound request and hand it to the dispatcher
//! - Map dispatch outcomes to client-visible status codes

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ProxyConfig;
use crate::dispatch::{Dispatcher, HyperTransport, ProxyRequest};
use crate::error::DispatchError;
use crate::http::request::{request_id_middleware, X_REQUEST_ID};
use crate::observability::metrics;
use crate::resolver::Resolver;
use crate::security::rate_limit::{rate_limit_middleware, RateLimiterState};

/// Largest request body the proxy will buffer for forwarding.
const MAX_BUFFERED_BODY: usize = 1024 * 1024;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher<Resolver, HyperTransport>>,
}

/// HTTP server for the alias proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Self {
        let resolver = Resolver::from_config(&config);
        let dispatcher = Arc::new(Dispatcher::new(resolver, HyperTransport::new()));

        let state = AppState { dispatcher };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let mut router = Router::new()
            .route("/{alias}", any(proxy_handler))
            .route("/{alias}/{*rest}", any(proxy_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(middleware::from_fn(request_id_middleware))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            );

        if config.rate_limit.enabled {
            let limiter = Arc::new(RateLimiterState::new(&config.rate_limit));
            router = router.layer(middleware::from_fn_with_state(
                limiter,
                rate_limit_middleware,
            ));
        }

        router
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown_signal() => {}
                    _ = shutdown.recv() => {}
                }
                tracing::info!("Shutdown signal received");
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

/// Main proxy handler.
/// Extracts the alias, buffers the request, and dispatches it.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let method_str = request.method().to_string();
    let (alias, path_and_query) = split_alias(request.uri());

    if alias.is_empty() {
        metrics::record_request(&method_str, 404, start_time);
        return (StatusCode::NOT_FOUND, "Alias not found").into_response();
    }

    tracing::debug!(
        request_id = %request_id,
        method = %method_str,
        alias = %alias,
        path = %path_and_query,
        "Proxying request"
    );

    // Buffer the body so the recovery attempt can replay it.
    let (parts, body) = request.into_parts();
    let body_bytes = match axum::body::to_bytes(body, MAX_BUFFERED_BODY).await {
        Ok(bytes) => bytes,
        Err(_) => {
            metrics::record_request(&method_str, 413, start_time);
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };

    let proxy_request = ProxyRequest {
        method: parts.method,
        version: parts.version,
        headers: parts.headers,
        path_and_query,
        body: body_bytes,
    };

    match state.dispatcher.handle(&alias, &proxy_request).await {
        Ok(response) => {
            // Backend statuses, 5xx included, pass through verbatim.
            let status = response.status();
            metrics::record_request(&method_str, status.as_u16(), start_time);

            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body)).into_response()
        }
        Err(DispatchError::AliasNotFound { .. }) => {
            tracing::warn!(request_id = %request_id, alias = %alias, "Alias not found");
            metrics::record_request(&method_str, 404, start_time);
            (StatusCode::NOT_FOUND, "Alias not found").into_response()
        }
        Err(DispatchError::UpstreamUnavailable { .. }) => {
            tracing::error!(request_id = %request_id, alias = %alias, "Upstream unavailable");
            metrics::record_request(&method_str, 502, start_time);
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}

/// Split the alias off the front of the request path.
///
/// The alias segment is consumed; the remainder (plus any query string) is
/// what gets forwarded to the backend.
fn split_alias(uri: &Uri) -> (String, String) {
    let trimmed = uri.path().trim_start_matches('/');
    let (alias, rest) = match trimmed.split_once('/') {
        Some((alias, rest)) => (alias.to_string(), format!("/{}", rest)),
        None => (trimmed.to_string(), "/".to_string()),
    };

    let path_and_query = match uri.query() {
        Some(query) => format!("{}?{}", rest, query),
        None => rest,
    };
    (alias, path_and_query)
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
}
