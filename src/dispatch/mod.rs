//! Dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Router (resolved target or none)
//!     → registry.rs (shared instance for static calls, fresh instance + init otherwise)
//!     → handler.rs (responds_to? → invoke(router, args))
//!     → dispatcher.rs (fallback: http404 on same handler, then fatal 500)
//!     → Reply to the HTTP layer
//! ```
//!
//! # Design Decisions
//! - Handlers are injected through a registry, never looked up globally
//! - The router is always the first argument of a handler call
//! - Only the fatal error leaves the dispatcher; everything else degrades to `http404`

use axum::http::StatusCode;
use thiserror::Error;

pub mod builtin;
pub mod dispatcher;
pub mod handler;
pub mod registry;

pub use dispatcher::{Dispatcher, Invocation};
pub use handler::{Action, ActionMap, Handler, NOT_FOUND_METHOD};
pub use registry::{Acquired, HandlerRegistry};

/// Reasons a request could not be served by its resolved target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// No rule matched the request.
    #[error("no route matches {verb} {path}")]
    NoRouteMatch { verb: String, path: String },

    /// The handler is unknown, lacks the binding, or does not declare the method.
    #[error("handler '{handler}' cannot invoke '{method}'")]
    HandlerNotInvokable { handler: String, method: String },

    /// The not-found method is not available either.
    #[error("no not-found method available (handler: {handler:?})")]
    NotFoundNotInvokable { handler: Option<String> },
}

impl DispatchError {
    /// HTTP status implied by this error.
    pub fn status(&self) -> StatusCode {
        match self {
            DispatchError::NoRouteMatch { .. } | DispatchError::HandlerNotInvokable { .. } => {
                StatusCode::NOT_FOUND
            }
            DispatchError::NotFoundNotInvokable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::NoRouteMatch { .. } => "no_route",
            DispatchError::HandlerNotInvokable { .. } => "not_invokable",
            DispatchError::NotFoundNotInvokable { .. } => "fatal",
        }
    }
}
