//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → rate_limit.rs (check per-client limits)
//!     → Pass to dispatch; rejected traffic never reaches the core
//! ```

pub mod rate_limit;

pub use rate_limit::{rate_limit_middleware, RateLimiterState};
