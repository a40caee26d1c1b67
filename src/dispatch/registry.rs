//! Handler registry.
//!
//! # Responsibilities
//! - Map handler identifiers to shared instances and/or factories
//! - Hand out the handler matching a target's binding
//!
//! # Design Decisions
//! - Injected into the dispatcher; there is no global lookup by name
//! - `Static` binding uses the shared instance, `Instance` builds a fresh one
//! - A binding the registration does not provide is treated as a missing handler

use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::dispatch::handler::Handler;
use crate::routing::Binding;

type Factory = Box<dyn Fn() -> Box<dyn Handler> + Send + Sync>;

#[derive(Default)]
struct Registration {
    shared: Option<Arc<dyn Handler>>,
    factory: Option<Factory>,
}

/// A handler ready to be invoked.
pub enum Acquired {
    Shared(Arc<dyn Handler>),
    Owned(Box<dyn Handler>),
}

impl Deref for Acquired {
    type Target = dyn Handler;

    fn deref(&self) -> &Self::Target {
        match self {
            Acquired::Shared(handler) => handler.as_ref(),
            Acquired::Owned(handler) => handler.as_ref(),
        }
    }
}

/// Handlers known to the dispatcher, by identifier.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Registration>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the shared instance used for static calls.
    pub fn register_shared<H: Handler + 'static>(&mut self, id: impl Into<String>, handler: H) -> &mut Self {
        self.handlers.entry(id.into()).or_default().shared = Some(Arc::new(handler));
        self
    }

    /// Register the factory used to build per-request instances.
    pub fn register_factory<H, F>(&mut self, id: impl Into<String>, factory: F) -> &mut Self
    where
        H: Handler + 'static,
        F: Fn() -> H + Send + Sync + 'static,
    {
        self.handlers.entry(id.into()).or_default().factory =
            Some(Box::new(move || Box::new(factory()) as Box<dyn Handler>));
        self
    }

    /// Whether anything is registered under `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.handlers.contains_key(id)
    }

    /// Obtain the handler for `id` with the requested binding.
    ///
    /// Per-request instances are initialized before being returned.
    pub fn acquire(&self, id: &str, binding: Binding) -> Option<Acquired> {
        let registration = self.handlers.get(id)?;
        match binding {
            Binding::Static => registration.shared.clone().map(Acquired::Shared),
            Binding::Instance => registration.factory.as_ref().map(|factory| {
                let mut handler = factory();
                handler.init();
                Acquired::Owned(handler)
            }),
        }
    }

    /// Obtain the handler for `id` with whichever binding is available,
    /// preferring the shared instance.
    pub fn acquire_any(&self, id: &str) -> Option<Acquired> {
        self.acquire(id, Binding::Static)
            .or_else(|| self.acquire(id, Binding::Instance))
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.handlers.keys().collect();
        ids.sort();
        f.debug_struct("HandlerRegistry").field("handlers", &ids).finish()
    }
}
