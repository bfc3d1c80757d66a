//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the alias proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Alias definitions for the static resolver.
    pub aliases: Vec<AliasConfig>,

    /// Backend resolution mode and store parameters.
    pub resolver: ResolverConfig,

    /// Rate limiting configuration.
    pub rate_limit: RateLimitConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// One alias and its ordered backend list.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AliasConfig {
    /// Routing key matched against the first request path segment.
    pub name: String,

    /// Backend addresses (e.g., "127.0.0.1:32769"), in rotation order.
    pub endpoints: Vec<String>,
}

/// Backend resolution configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ResolverConfig {
    /// Where backend sets come from.
    pub mode: ResolverMode,

    /// Store connection parameters, required when `mode = "store"`.
    pub store: Option<StoreConfig>,
}

/// Backend resolution mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResolverMode {
    /// Immutable alias table loaded at startup.
    #[default]
    Static,

    /// External store queried on every resolution.
    Store,
}

/// Connection parameters for the external backend store.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Base URL of the store (e.g., "http://127.0.0.1:7000").
    pub url: String,

    /// Per-lookup timeout in seconds.
    #[serde(default = "default_store_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_store_timeout_secs() -> u64 {
    2
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable the per-client rate limiter.
    pub enabled: bool,

    /// Sustained requests per second allowed per client.
    pub requests_per_second: u32,

    /// Burst capacity per client.
    pub burst: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests_per_second: 100,
            burst: 200,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus metrics exporter.
    pub metrics_enabled: bool,

    /// Address the metrics exporter listens on.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
