//! Static alias table resolver.

use std::collections::HashMap;

use crate::balance::{BackendSet, Endpoint};
use crate::config::AliasConfig;
use crate::resolver::BackendResolver;

/// Immutable alias table loaded at startup. Lookups are pure.
#[derive(Debug, Default)]
pub struct StaticTableResolver {
    table: HashMap<String, BackendSet>,
}

impl StaticTableResolver {
    /// Build the table from configuration.
    ///
    /// Unparseable addresses are skipped with a warning rather than
    /// rejecting the whole alias; validation reports them at load time.
    pub fn new(aliases: &[AliasConfig]) -> Self {
        let mut table: HashMap<String, BackendSet> = HashMap::new();
        for alias in aliases {
            let mut set = BackendSet::with_capacity(alias.endpoints.len());
            for address in &alias.endpoints {
                match address.parse::<Endpoint>() {
                    Ok(endpoint) => set.push(endpoint),
                    Err(_) => {
                        tracing::warn!(
                            alias = %alias.name,
                            address = %address,
                            "Invalid backend address, skipping"
                        );
                    }
                }
            }
            table.insert(alias.name.clone(), set);
        }
        Self { table }
    }
}

impl BackendResolver for StaticTableResolver {
    async fn resolve(&self, alias: &str) -> BackendSet {
        match self.table.get(alias) {
            Some(set) => set.clone(),
            None => {
                tracing::debug!(alias = %alias, "Alias not in static table");
                BackendSet::new()
            }
        }
    }
}
