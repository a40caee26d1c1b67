//! Target invocation with not-found and fatal fallbacks.
//!
//! # State Machine
//! ```text
//! Resolved ──acquire handler──▶ Invoke ──method invokable──▶ Invoked
//!    │                            │
//!    │ no route / no handler      │ method not invokable
//!    ▼                            ▼
//! NotFound (fallback handler)  NotFound (same handler)
//!    │  http404 invokable ──▶ Invoked (router only, no args)
//!    │  otherwise
//!    ▼
//! Fatal (500)
//! ```

use crate::dispatch::handler::NOT_FOUND_METHOD;
use crate::dispatch::registry::{Acquired, HandlerRegistry};
use crate::dispatch::DispatchError;
use crate::http::Reply;
use crate::routing::Router;

/// What was actually invoked for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Handler identifier the call went to.
    pub handler: String,
    /// Method that was called (`http404` after a fallback).
    pub method: String,
    /// The handler's reply.
    pub reply: Reply,
    /// Why the resolved target was not called, if it wasn't.
    pub degraded_from: Option<DispatchError>,
}

impl Invocation {
    pub fn is_fallback(&self) -> bool {
        self.degraded_from.is_some()
    }
}

/// Invokes resolved targets through a handler registry.
#[derive(Debug, Default)]
pub struct Dispatcher {
    registry: HandlerRegistry,
    fallback_handler: Option<String>,
}

impl Dispatcher {
    pub fn new(registry: HandlerRegistry) -> Self {
        Self {
            registry,
            fallback_handler: None,
        }
    }

    /// Handler whose `http404` serves requests that have no handler of their own.
    pub fn with_fallback(mut self, handler: impl Into<String>) -> Self {
        self.fallback_handler = Some(handler.into());
        self
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Invoke the router's target, degrading to `http404` and then to a fatal error.
    ///
    /// The router is always the first argument of the call. An `Err` means no
    /// handler method was called and the request must be answered with a 500.
    pub fn dispatch(&self, router: &Router) -> Result<Invocation, DispatchError> {
        let (context, cause) = match router.target() {
            None => (
                self.fallback_context(),
                DispatchError::NoRouteMatch {
                    verb: router.verb().to_string(),
                    path: router.path().to_string(),
                },
            ),
            Some(target) => {
                let cause = DispatchError::HandlerNotInvokable {
                    handler: target.handler.clone(),
                    method: target.raw_method.clone(),
                };
                match self.registry.acquire(&target.handler, target.binding) {
                    Some(handler) if handler.responds_to(&target.method) => {
                        tracing::debug!(
                            handler = %target.handler,
                            method = %target.method,
                            binding = ?target.binding,
                            args = target.args.len(),
                            "Invoking handler"
                        );
                        let reply = handler.invoke(&target.method, router, &target.args);
                        return Ok(Invocation {
                            handler: target.handler.clone(),
                            method: target.method.clone(),
                            reply,
                            degraded_from: None,
                        });
                    }
                    Some(handler) => (Some((target.handler.clone(), handler)), cause),
                    None => (self.fallback_context(), cause),
                }
            }
        };

        tracing::warn!(verb = %router.verb(), path = %router.path(), reason = %cause, "Falling back to not-found handler");
        self.not_found(router, context, cause)
    }

    fn fallback_context(&self) -> Option<(String, Acquired)> {
        let id = self.fallback_handler.as_ref()?;
        let handler = self.registry.acquire_any(id)?;
        Some((id.clone(), handler))
    }

    fn not_found(
        &self,
        router: &Router,
        context: Option<(String, Acquired)>,
        cause: DispatchError,
    ) -> Result<Invocation, DispatchError> {
        match context {
            Some((id, handler)) if handler.responds_to(NOT_FOUND_METHOD) => {
                let reply = handler.invoke(NOT_FOUND_METHOD, router, &[]);
                Ok(Invocation {
                    handler: id,
                    method: NOT_FOUND_METHOD.to_string(),
                    reply,
                    degraded_from: Some(cause),
                })
            }
            context => {
                let handler = context.map(|(id, _)| id);
                tracing::error!(
                    verb = %router.verb(),
                    path = %router.path(),
                    handler = ?handler,
                    reason = %cause,
                    "No available method to serve the requested URL"
                );
                Err(DispatchError::NotFoundNotInvokable { handler })
            }
        }
    }
}
