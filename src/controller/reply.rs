//! Action output.

use axum::http::StatusCode;
use serde::Serialize;

use crate::controller::ControllerError;

/// What an action hands back to the HTTP layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Html(String),
    Text(String),
    Json(serde_json::Value),
    /// 303 See Other to the given location.
    Redirect(String),
    /// Explicit status with a plain-text body.
    Status(StatusCode, String),
    /// 204 No Content.
    Empty,
}

impl Reply {
    /// Serialize a value as a JSON reply.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, ControllerError> {
        serde_json::to_value(value)
            .map(Reply::Json)
            .map_err(|e| ControllerError::Internal(format!("failed to serialize reply: {}", e)))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Reply::Html(_) | Reply::Text(_) | Reply::Json(_) => StatusCode::OK,
            Reply::Redirect(_) => StatusCode::SEE_OTHER,
            Reply::Status(status, _) => *status,
            Reply::Empty => StatusCode::NO_CONTENT,
        }
    }
}
