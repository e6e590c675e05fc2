//! HTTP error mapping
//!
//! Every handler error is a [`DataError`]; its status and code travel in a
//! small JSON body.

use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::DataError;

/// Header carrying the resolved actor identity
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Seconds a client should wait before retrying a transient failure
pub const RETRY_AFTER_SECS: &str = "1";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

impl IntoResponse for DataError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorResponse {
            error: self.to_string(),
            code: self.code(),
        };
        let mut response = (status, Json(body)).into_response();
        if self.is_transient() {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from_static(RETRY_AFTER_SECS));
        }
        response
    }
}

/// Actor identity from the request, if any
pub fn actor(headers: &HeaderMap) -> Option<String> {
    headers
        .get(ACTOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Actor identity, required for mutating routes
pub fn require_actor(headers: &HeaderMap) -> Result<String, DataError> {
    actor(headers).ok_or_else(|| DataError::forbidden("actor identity required"))
}
