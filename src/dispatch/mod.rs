//! Dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! handle(alias, request)
//!     → resolver (current BackendSet; empty → AliasNotFound)
//!     → rotation (pick endpoint, advance cursor)
//!     → transport.rs (forward to endpoint)
//!     → on transport failure: one recovery cycle
//!         re-resolve (empty → AliasNotFound) → fresh pick → forward
//!         second failure → UpstreamUnavailable
//! ```
//!
//! # Design Decisions
//! - Exactly one recovery attempt per inbound request, modeled as an
//!   explicit state machine rather than a retry loop
//! - The two forward attempts of one request are sequential, never
//!   concurrent
//! - Backend HTTP statuses pass through verbatim; only transport-level
//!   errors count as forwarding failures

pub mod dispatcher;
pub mod transport;

pub use dispatcher::Dispatcher;
pub use transport::{ForwardError, HyperTransport, ProxyRequest, ProxyTransport};
