//! Response handling.
//!
//! # Responsibilities
//! - Turn action replies into HTTP responses
//! - Map router errors to status codes
//!
//! # Design Decisions
//! - Not-found kinds echo their message; server errors answer with a
//!   generic body and leave the detail to the logs

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;

use crate::controller::Reply;
use crate::routing::RouterError;

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::Html(body) => Html(body).into_response(),
            Reply::Text(body) => (StatusCode::OK, body).into_response(),
            Reply::Json(value) => Json(value).into_response(),
            Reply::Redirect(location) => Redirect::to(&location).into_response(),
            Reply::Status(status, body) => (status, body).into_response(),
            Reply::Empty => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// Response for a failed dispatch.
pub fn error_response(error: &RouterError) -> Response {
    let status = error.status();
    if status.is_server_error() {
        let reason = status.canonical_reason().unwrap_or("Internal Server Error");
        (status, reason).into_response()
    } else {
        (status, error.to_string()).into_response()
    }
}
