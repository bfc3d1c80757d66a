//! Forwarding boundary.

use std::future::Future;

use axum::{
    body::{Body, Bytes},
    http::{header, uri::Scheme, HeaderMap, HeaderValue, Method, Request, Response, Uri, Version},
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;

use crate::balance::Endpoint;

/// Byte-level forwarding to a chosen endpoint.
///
/// Implementations fail only on transport-level problems (connect errors,
/// timeouts); any HTTP status the backend returns is a successful forward.
pub trait ProxyTransport: Send + Sync {
    type Request: Send + Sync;
    type Response: Send;
    type Error: std::fmt::Display + Send;

    /// Forward the request to one endpoint and return its response.
    fn forward(
        &self,
        endpoint: &Endpoint,
        request: &Self::Request,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send;
}

/// A fully buffered inbound request.
///
/// Buffered once so the dispatcher can rebuild it for the recovery attempt
/// after a forwarding failure.
#[derive(Debug, Clone)]
pub struct ProxyRequest {
    pub method: Method,
    pub version: Version,
    pub headers: HeaderMap,
    /// Path and query to forward, with the alias segment already stripped.
    pub path_and_query: String,
    pub body: Bytes,
}

/// Error from the hyper-based transport.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("invalid upstream request: {0}")]
    Build(#[from] axum::http::Error),

    #[error(transparent)]
    Client(#[from] hyper_util::client::legacy::Error),
}

/// HTTP forwarding over a shared hyper client.
#[derive(Debug, Clone)]
pub struct HyperTransport {
    client: Client<HttpConnector, Body>,
}

impl HyperTransport {
    pub fn new() -> Self {
        Self {
            client: Client::builder(TokioExecutor::new()).build(HttpConnector::new()),
        }
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ProxyTransport for HyperTransport {
    type Request = ProxyRequest;
    type Response = Response<hyper::body::Incoming>;
    type Error = ForwardError;

    async fn forward(
        &self,
        endpoint: &Endpoint,
        request: &ProxyRequest,
    ) -> Result<Self::Response, ForwardError> {
        let authority = endpoint.addr.to_string();
        let uri = Uri::builder()
            .scheme(Scheme::HTTP)
            .authority(authority.as_str())
            .path_and_query(request.path_and_query.as_str())
            .build()?;

        let mut builder = Request::builder()
            .method(request.method.clone())
            .version(request.version)
            .uri(uri);

        if let Some(headers) = builder.headers_mut() {
            for (name, value) in request.headers.iter() {
                headers.insert(name.clone(), value.clone());
            }
            // Point the Host header at the backend, not the proxy.
            if let Ok(host) = HeaderValue::from_str(&authority) {
                headers.insert(header::HOST, host);
            }
        }

        let upstream_request = builder.body(Body::from(request.body.clone()))?;
        Ok(self.client.request(upstream_request).await?)
    }
}
