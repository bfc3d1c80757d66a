//! Crate-wide error types.
//!
//! # Design Decisions
//! - The client-visible error space has exactly two terminal outcomes:
//!   `AliasNotFound` and `UpstreamUnavailable`. An alias whose backends
//!   vanish between the first and second resolution reports as not-found,
//!   the same as an alias that never existed.
//! - `EmptyBackendSet` never crosses the dispatcher boundary.
//! - Nothing here is fatal to the process; every failure resolves to a
//!   per-request error response.

use thiserror::Error;

/// Terminal outcome of dispatching one inbound request.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No backend set could be resolved for the alias, either on the
    /// initial resolution or after the recovery re-resolution.
    #[error("no backends resolved for alias '{alias}'")]
    AliasNotFound { alias: String },

    /// A non-empty backend set existed but forwarding failed on both the
    /// original attempt and the single recovery attempt.
    #[error("all forward attempts failed for alias '{alias}'")]
    UpstreamUnavailable { alias: String },
}

/// Signaled by the rotation tracker when asked to pick from zero endpoints.
///
/// Always intercepted by the dispatcher before it reaches a caller.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("cannot pick from an empty backend set")]
pub struct EmptyBackendSet;
