//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, catch-all handler)
//!     → request.rs (request ID, query + form parameters)
//!     → Router::dispatch (match, resolve controller, run action)
//!     → response.rs (Reply or RouterError → HTTP response)
//!     → Send to client
//! ```

pub mod params;
pub mod request;
pub mod response;
pub mod server;

pub use params::{Parsed, RequestParams};
pub use request::X_REQUEST_ID;
pub use server::{reload_routes, AppState, HttpServer};
