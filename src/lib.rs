//! Minimal MVC web framework.
//!
//! URLs are matched against a route table (templated paths such as
//! `/notes/[id]` or raw regular expressions), resolved to a controller and
//! action, and dispatched with `before`/`after` hooks around `_do` actions.

pub mod app;
pub mod config;
pub mod controller;
pub mod db;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod view;

pub use config::schema::AppConfig;
pub use controller::{Controller, ControllerRegistry, Reply};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{Router, RouterError};
