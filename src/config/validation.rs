//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check every route compiles and names a usable verb and action
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::AppConfig;
use crate::routing::{parse_verb, Router};

/// One semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `routes[2].action`.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::new("listener.max_body_bytes", "must be greater than 0"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if let Some(db) = &config.database {
        if db.max_connections == 0 {
            errors.push(ValidationError::new("database.max_connections", "must be greater than 0"));
        }
        if let Err(e) = crate::db::connection_url(db) {
            errors.push(ValidationError::new("database", e.to_string()));
        }
    }

    // Each route is compiled on its own so one bad route does not hide the next.
    for (index, route) in config.routes.iter().enumerate() {
        let field = format!("routes[{}]", index);

        if route.controller.is_empty() {
            errors.push(ValidationError::new(format!("{}.controller", field), "cannot be empty"));
        }
        if route.action.is_empty() {
            errors.push(ValidationError::new(format!("{}.action", field), "cannot be empty"));
        }

        let verb = match parse_verb(&route.verb) {
            Ok(verb) => verb,
            Err(e) => {
                errors.push(ValidationError::new(format!("{}.verb", field), e.to_string()));
                continue;
            }
        };

        if route.controller.is_empty() || route.action.is_empty() {
            continue;
        }

        let mut scratch = Router::new();
        if let Err(e) = scratch.add(&route.path, &route.controller, &route.action, verb) {
            errors.push(ValidationError::new(field, e.to_string()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
