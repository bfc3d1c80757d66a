//! External backend store resolver.
//!
//! Queries an HTTP store on every resolution: `GET {base}/aliases/{alias}`
//! returning a JSON array of `"host:port"` strings. Store failures resolve
//! to an empty set; "no backends for this alias" and "store unreachable"
//! are handled identically downstream.

use std::time::Duration;

use crate::balance::{BackendSet, Endpoint};
use crate::config::StoreConfig;
use crate::resolver::BackendResolver;

/// Resolver backed by an external HTTP store.
#[derive(Debug)]
pub struct StoreResolver {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl StoreResolver {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

impl BackendResolver for StoreResolver {
    async fn resolve(&self, alias: &str) -> BackendSet {
        let url = format!("{}/aliases/{}", self.base_url, alias);

        let response = match self.client.get(&url).timeout(self.timeout).send().await {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(alias = %alias, error = %error, "Backend store unreachable");
                return BackendSet::new();
            }
        };

        if !response.status().is_success() {
            tracing::debug!(
                alias = %alias,
                status = %response.status(),
                "Store has no backends for alias"
            );
            return BackendSet::new();
        }

        let payload = match response.bytes().await {
            Ok(payload) => payload,
            Err(error) => {
                tracing::warn!(alias = %alias, error = %error, "Store response truncated");
                return BackendSet::new();
            }
        };
        let addresses: Vec<String> = match serde_json::from_slice(&payload) {
            Ok(addresses) => addresses,
            Err(error) => {
                tracing::warn!(alias = %alias, error = %error, "Malformed store response");
                return BackendSet::new();
            }
        };

        let mut set = BackendSet::with_capacity(addresses.len());
        for address in &addresses {
            match address.parse::<Endpoint>() {
                Ok(endpoint) => set.push(endpoint),
                Err(_) => {
                    tracing::warn!(
                        alias = %alias,
                        address = %address,
                        "Invalid backend address from store, skipping"
                    );
                }
            }
        }
        set
    }
}
