//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, alias extraction)
//!     → request.rs (request ID)
//!     → dispatch (resolve, rotate, forward)
//!     → Response mapped back to the client
//! ```

pub mod request;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::HttpServer;
