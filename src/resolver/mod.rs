//! Backend resolution subsystem.
//!
//! # Data Flow
//! ```text
//! Alias (routing key)
//!     → static_table.rs (immutable in-memory table), or
//!     → store.rs (external HTTP store, queried per resolution)
//!     → Return ordered BackendSet (possibly empty)
//! ```
//!
//! # Design Decisions
//! - Resolution never fails: an unknown alias and an unreachable store
//!   both resolve to an empty set, which the dispatcher handles identically
//! - No caching layer; the store variant performs I/O on every call
//! - The dispatcher only sees the `BackendResolver` trait and does not know
//!   which variant is in use

pub mod static_table;
pub mod store;

use std::future::Future;

use crate::balance::BackendSet;
use crate::config::{ProxyConfig, ResolverMode};

pub use static_table::StaticTableResolver;
pub use store::StoreResolver;

/// Capability interface for turning an alias into its current backend set.
pub trait BackendResolver: Send + Sync {
    /// Resolve the current ordered backend set for an alias.
    ///
    /// Infallible by contract: unknown aliases and store failures both
    /// resolve to an empty set.
    fn resolve(&self, alias: &str) -> impl Future<Output = BackendSet> + Send;
}

/// Resolver variant selected from configuration.
#[derive(Debug)]
pub enum Resolver {
    Static(StaticTableResolver),
    Store(StoreResolver),
}

impl Resolver {
    /// Build the configured resolver variant.
    ///
    /// Store mode without store parameters falls back to the static table;
    /// validation rejects that combination before it reaches here.
    pub fn from_config(config: &ProxyConfig) -> Self {
        match (config.resolver.mode, &config.resolver.store) {
            (ResolverMode::Store, Some(store)) => {
                Resolver::Store(StoreResolver::new(store))
            }
            (ResolverMode::Store, None) => {
                tracing::warn!("Store resolver selected without store config, using static table");
                Resolver::Static(StaticTableResolver::new(&config.aliases))
            }
            (ResolverMode::Static, _) => {
                Resolver::Static(StaticTableResolver::new(&config.aliases))
            }
        }
    }
}

impl BackendResolver for Resolver {
    async fn resolve(&self, alias: &str) -> BackendSet {
        match self {
            Resolver::Static(r) => r.resolve(alias).await,
            Resolver::Store(r) => r.resolve(alias).await,
        }
    }
}
