//! Backend selection subsystem.
//!
//! # Data Flow
//! ```text
//! Alias extracted from request path
//!     → resolver produces the current BackendSet (ordered endpoints)
//!     → rotation.rs (pick endpoint under the per-alias cursor, advance)
//!     → Return selected Endpoint or EmptyBackendSet
//! ```
//!
//! # Design Decisions
//! - Endpoints are plain values compared by address; no connection or
//!   health state is tracked on them
//! - Rotation cursors are the only mutable shared state in the core
//! - Wrap-around always uses the set length at call time, so a set may
//!   shrink or grow between picks without a cursor reset

pub mod endpoint;
pub mod rotation;

pub use endpoint::{BackendSet, Endpoint};
pub use rotation::RotationTracker;
