//! Alias-keyed round-robin reverse proxy library.

pub mod balance;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resolver;
pub mod security;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
