//! Errors raised by controller actions and hooks.

use axum::http::StatusCode;
use thiserror::Error;

use crate::db::DatabaseError;
use crate::view::ViewError;

/// Failure inside a controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// The request was malformed or missing parameters.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The addressed resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A `before` hook refused the request.
    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    View(#[from] ViewError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ControllerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ControllerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ControllerError::NotFound(_) => StatusCode::NOT_FOUND,
            ControllerError::Forbidden(_) => StatusCode::FORBIDDEN,
            ControllerError::Database(_)
            | ControllerError::View(_)
            | ControllerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
