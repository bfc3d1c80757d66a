//! Per-alias round-robin rotation.

use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;

use crate::balance::endpoint::{BackendSet, Endpoint};
use crate::error::EmptyBackendSet;

/// Round-robin cursor state, one cursor per alias.
///
/// Cursors are created lazily on the first pick for an alias and live for
/// the process; the map only grows, bounded by the number of distinct
/// aliases the proxy ever sees.
#[derive(Debug, Default)]
pub struct RotationTracker {
    cursors: DashMap<String, AtomicUsize>,
}

impl RotationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick the endpoint under the alias's cursor and advance the cursor by
    /// one, wrapping at the current set length.
    ///
    /// The read-modify-write is a single CAS loop, so two concurrent picks
    /// for the same alias always observe distinct, consecutive indices. A
    /// stale cursor left beyond the bounds of a shrunk set is re-normalized
    /// by the modulo before indexing.
    pub fn pick_next(
        &self,
        alias: &str,
        backends: &BackendSet,
    ) -> Result<Endpoint, EmptyBackendSet> {
        if backends.is_empty() {
            return Err(EmptyBackendSet);
        }
        let len = backends.len();
        let cursor = self
            .cursors
            .entry(alias.to_string())
            .or_insert_with(|| AtomicUsize::new(0));

        let mut current = cursor.load(Ordering::Relaxed);
        loop {
            let index = current % len;
            match cursor.compare_exchange_weak(
                current,
                (index + 1) % len,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return Ok(backends[index]),
                Err(observed) => current = observed,
            }
        }
    }
}
