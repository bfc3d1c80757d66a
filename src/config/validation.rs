//! Configuration validation.
//!
//! Semantic checks on top of serde's syntactic parsing. Validation is a
//! pure function and returns all errors, not just the first, so a broken
//! config can be fixed in one pass.

use std::collections::HashSet;

use thiserror::Error;
use url::Url;

use crate::balance::Endpoint;
use crate::config::schema::{ProxyConfig, ResolverMode};

/// One semantic problem found in a configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("alias name must not be empty")]
    EmptyAliasName,

    #[error("duplicate alias '{0}'")]
    DuplicateAlias(String),

    #[error("alias '{0}' has no endpoints")]
    NoEndpoints(String),

    #[error("alias '{alias}' has invalid endpoint address '{address}'")]
    InvalidEndpoint { alias: String, address: String },

    #[error("resolver mode is 'store' but no store is configured")]
    MissingStoreConfig,

    #[error("invalid store url '{0}'")]
    InvalidStoreUrl(String),

    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),
}

/// Validate a parsed configuration before it is accepted into the system.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut seen = HashSet::new();
    for alias in &config.aliases {
        if alias.name.is_empty() {
            errors.push(ValidationError::EmptyAliasName);
        } else if !seen.insert(alias.name.as_str()) {
            errors.push(ValidationError::DuplicateAlias(alias.name.clone()));
        }

        if alias.endpoints.is_empty() && config.resolver.mode == ResolverMode::Static {
            errors.push(ValidationError::NoEndpoints(alias.name.clone()));
        }

        for address in &alias.endpoints {
            if address.parse::<Endpoint>().is_err() {
                errors.push(ValidationError::InvalidEndpoint {
                    alias: alias.name.clone(),
                    address: address.clone(),
                });
            }
        }
    }

    match (config.resolver.mode, &config.resolver.store) {
        (ResolverMode::Store, None) => errors.push(ValidationError::MissingStoreConfig),
        (ResolverMode::Store, Some(store)) => {
            if Url::parse(&store.url).is_err() {
                errors.push(ValidationError::InvalidStoreUrl(store.url.clone()));
            }
            if store.timeout_secs == 0 {
                errors.push(ValidationError::ZeroValue("resolver.store.timeout_secs"));
            }
        }
        (ResolverMode::Static, _) => {}
    }

    if config.rate_limit.enabled {
        if config.rate_limit.requests_per_second == 0 {
            errors.push(ValidationError::ZeroValue("rate_limit.requests_per_second"));
        }
        if config.rate_limit.burst == 0 {
            errors.push(ValidationError::ZeroValue("rate_limit.burst"));
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroValue("timeouts.request_secs"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
