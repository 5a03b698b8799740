//! Request handling.
//!
//! # Responsibilities
//! - Read the request ID set by the request-id layer
//! - Collect query and form parameters for controllers
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Only `application/x-www-form-urlencoded` bodies are decoded; other
//!   bodies are left to the action

use axum::body::Bytes;
use axum::http::{header, HeaderMap, Uri};
use percent_encoding::percent_decode_str;
use uuid::Uuid;

use crate::http::params::RequestParams;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// The request ID, or a fresh UUID v4 when the header is absent.
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// The request path with percent-escapes decoded, or `None` when the
/// decoded bytes are not UTF-8.
pub fn decoded_path(uri: &Uri) -> Option<String> {
    percent_decode_str(uri.path())
        .decode_utf8()
        .ok()
        .map(|path| path.into_owned())
}

/// True when the body is an urlencoded form.
pub fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.split(';').next().unwrap_or_default().trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
        .unwrap_or(false)
}

/// Query parameters merged with form fields; form fields win.
pub fn params(uri: &Uri, headers: &HeaderMap, body: &Bytes) -> RequestParams {
    let form = is_form(headers).then_some(body.as_ref());
    RequestParams::from_parts(uri.query(), form)
}
