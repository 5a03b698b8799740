//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, every route compiled once)
//!     → AppConfig (validated, immutable)
//!     → routes → routing::Router::from_config
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → server builds a new Router and swaps it in atomically
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    AppConfig, DatabaseConfig, ListenerConfig, ObservabilityConfig, RouteConfig, TimeoutConfig,
    ViewConfig,
};
pub use validation::{validate_config, ValidationError};
pub use watcher::ConfigWatcher;
