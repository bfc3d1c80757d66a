//! Request identity.

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Attach a UUID v4 request ID when the client did not send one.
///
/// Runs as early as possible so the ID is visible to tracing, the
/// dispatcher, and the forwarded request.
pub async fn request_id_middleware(mut request: Request<Body>, next: Next) -> Response {
    if !request.headers().contains_key(X_REQUEST_ID) {
        let id = Uuid::new_v4().to_string();
        if let Ok(value) = HeaderValue::from_str(&id) {
            request.headers_mut().insert(X_REQUEST_ID, value);
        }
    }
    next.run(request).await
}
