//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! application. All types derive Serde traits for deserialization from
//! config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Route definitions, in precedence order.
    pub routes: Vec<RouteConfig>,

    /// Database connection; no pool is opened when absent.
    pub database: Option<DatabaseConfig>,

    /// View directory settings.
    pub views: ViewConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum accepted request body in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// A route: path specification → controller/action for one verb.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RouteConfig {
    /// Path specification (`/about/[id]`) or raw pattern (`/^...$/`).
    pub path: String,

    /// Controller name or `$` back-reference.
    pub controller: String,

    /// Action name or `$` back-reference.
    pub action: String,

    /// HTTP verb (default: GET).
    #[serde(default = "default_verb")]
    pub verb: String,
}

fn default_verb() -> String {
    "GET".to_string()
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// Time allowed for in-flight requests after a shutdown signal.
    pub shutdown_grace_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            shutdown_grace_secs: 10,
        }
    }
}

/// Database connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Full connection URL; takes precedence over the individual fields.
    pub url: Option<String>,

    /// Database system (`sqlite`, `postgres`).
    pub dbms: String,

    /// Host (and optional port).
    pub host: String,

    /// Database name (file name for sqlite).
    pub name: String,

    pub user: String,

    pub password: String,

    /// Pool size.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            dbms: "sqlite".to_string(),
            host: "localhost".to_string(),
            name: String::new(),
            user: String::new(),
            password: String::new(),
            max_connections: 5,
        }
    }
}

/// View settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Directory holding view files.
    pub dir: String,

    /// View file extension, without the dot.
    pub extension: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            dir: "views".to_string(),
            extension: "html".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "mvc_router=debug,tower_http=debug".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
