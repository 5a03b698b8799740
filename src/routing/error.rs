//! Routing error taxonomy.

use axum::http::StatusCode;
use thiserror::Error;

use crate::controller::ControllerError;

/// Errors raised by route registration and dispatch.
///
/// `match_and_parse` never produces `RouteNotFound`; a miss there is a plain
/// `Ok(None)`. The not-found kinds only surface from `dispatch`.
#[derive(Debug, Error)]
pub enum RouterError {
    /// Action resolved to one of the lifecycle hook names.
    #[error("action cannot be 'before' or 'after' (got '{action}')")]
    ReservedAction { action: String },

    /// No pattern + verb matched, or the controller could not be resolved.
    #[error("route does not exist: {verb} {url}")]
    RouteNotFound { verb: String, url: String },

    /// Controller exists but exposes neither `<action>` nor `<action>_do`.
    #[error("action does not exist: {controller}::{action}")]
    ActionNotFound { controller: String, action: String },

    /// Registration with an empty path specification.
    #[error("path specification cannot be empty")]
    EmptyPath,

    /// The path specification did not compile.
    #[error("invalid route pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// A verb that is not a valid HTTP method token.
    #[error("invalid HTTP verb '{verb}'")]
    InvalidVerb { verb: String },

    /// A `$` reference names a group the pattern does not define.
    #[error("pattern '{pattern}' has no capture group '{reference}'")]
    UnknownCapture { pattern: String, reference: String },

    /// A `$` reference names a group that did not participate in the match.
    #[error("capture group '{reference}' did not participate in the match for '{url}'")]
    UnresolvedCapture { reference: String, url: String },

    /// The action ran and failed.
    #[error(transparent)]
    Action(#[from] ControllerError),
}

impl RouterError {
    /// HTTP status the surrounding layer should answer with.
    pub fn status(&self) -> StatusCode {
        match self {
            RouterError::RouteNotFound { .. } | RouterError::ActionNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            RouterError::Action(e) => e.status(),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RouterError::ReservedAction { .. } => "reserved_action",
            RouterError::RouteNotFound { .. } => "route_not_found",
            RouterError::ActionNotFound { .. } => "action_not_found",
            RouterError::EmptyPath => "empty_path",
            RouterError::InvalidPattern { .. } => "invalid_pattern",
            RouterError::InvalidVerb { .. } => "invalid_verb",
            RouterError::UnknownCapture { .. } => "unknown_capture",
            RouterError::UnresolvedCapture { .. } => "unresolved_capture",
            RouterError::Action(_) => "action_failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let not_found = RouterError::RouteNotFound {
            verb: "GET".into(),
            url: "/nope".into(),
        };
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let missing_action = RouterError::ActionNotFound {
            controller: "Home".into(),
            action: "gone".into(),
        };
        assert_eq!(missing_action.status(), StatusCode::NOT_FOUND);

        let reserved = RouterError::ReservedAction {
            action: "before".into(),
        };
        assert_eq!(reserved.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let failed = RouterError::from(ControllerError::BadRequest("missing name".into()));
        assert_eq!(failed.status(), StatusCode::BAD_REQUEST);
        assert_eq!(failed.kind(), "action_failed");
    }
}
