//! Response values produced by handlers.
//!
//! # Responsibilities
//! - Carry status, content type and body from a handler to the host
//! - Convert into an axum response for transmission
//! - Provide the fatal 500 reply used when no handler can serve a request
//!
//! # Design Decisions
//! - Plain data, no streaming: dispatch is synchronous and in-memory
//! - Transmission is left to axum; this type never touches the socket

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Body returned with the fatal 500 reply.
pub const FATAL_MESSAGE: &str = "No available method to serve the requested URL.";

/// A handler's reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: StatusCode,
    pub content_type: &'static str,
    pub body: String,
}

impl Reply {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: body.into(),
        }
    }

    /// 200 with a plain text body.
    pub fn text(body: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, body)
    }

    /// JSON body with the given status.
    ///
    /// Serialization failures fall back to a 500 reply.
    pub fn json<T: Serialize>(status: StatusCode, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self {
                status,
                content_type: "application/json",
                body,
            },
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize reply body");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to serialize response")
            }
        }
    }

    pub fn not_found(body: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, body)
    }

    /// The reply sent when neither the target nor `http404` could be invoked.
    pub fn internal_error() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, FATAL_MESSAGE)
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        (self.status, [(header::CONTENT_TYPE, self.content_type)], self.body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_reply() {
        let reply = Reply::json(StatusCode::CREATED, &json!({"ok": true}));
        assert_eq!(reply.status, StatusCode::CREATED);
        assert_eq!(reply.content_type, "application/json");
        assert_eq!(reply.body, r#"{"ok":true}"#);
    }

    #[test]
    fn test_internal_error_reply() {
        let reply = Reply::internal_error();
        assert_eq!(reply.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(reply.body, FATAL_MESSAGE);
    }

    #[test]
    fn test_into_response_keeps_status_and_type() {
        let response = Reply::not_found("gone").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
    }
}
