//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     Load config → Validate → Build resolver/dispatcher → Start listener
//!
//! Shutdown:
//!     Ctrl+C or Shutdown::trigger → Stop accepting → Drain → Exit
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
