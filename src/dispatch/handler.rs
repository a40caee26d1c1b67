//! Handler interface.
//!
//! A handler exposes named methods. The dispatcher asks whether a method is
//! invokable before calling it, so a handler never sees a call for a method it
//! does not declare.

use std::collections::HashMap;
use std::fmt;

use crate::http::Reply;
use crate::routing::Router;

/// Method invoked when the resolved method is not invokable.
pub const NOT_FOUND_METHOD: &str = "http404";

/// A request handler.
pub trait Handler: Send + Sync {
    /// Lifecycle hook run once after a per-request instance is built.
    ///
    /// Shared (static) handlers are never initialized by the dispatcher.
    fn init(&mut self) {}

    /// Whether `method` can be invoked on this handler.
    fn responds_to(&self, method: &str) -> bool;

    /// Invoke `method` with the request's router and positional arguments.
    fn invoke(&self, method: &str, router: &Router, args: &[String]) -> Reply;
}

/// A handler method: receives the handler state, the router and the arguments.
pub type Action<S> = fn(&S, &Router, &[String]) -> Reply;

/// A [`Handler`] built from a state value and a table of named actions.
///
/// ```rust,ignore
/// let handler = ActionMap::new(ProjectState::default())
///     .on_init(|state| state.loaded = true)
///     .action("archive", |state, router, args| Reply::text(format!("archived {}", args[0])))
///     .action("http404", |_, router, _| Reply::not_found(router.path().to_string()));
/// ```
pub struct ActionMap<S> {
    state: S,
    actions: HashMap<&'static str, Action<S>>,
    init: Option<fn(&mut S)>,
}

impl<S> ActionMap<S> {
    pub fn new(state: S) -> Self {
        Self {
            state,
            actions: HashMap::new(),
            init: None,
        }
    }

    /// Register a named action.
    pub fn action(mut self, name: &'static str, action: Action<S>) -> Self {
        self.actions.insert(name, action);
        self
    }

    /// Set the lifecycle initializer.
    pub fn on_init(mut self, init: fn(&mut S)) -> Self {
        self.init = Some(init);
        self
    }

    pub fn state(&self) -> &S {
        &self.state
    }
}

impl<S: Send + Sync> Handler for ActionMap<S> {
    fn init(&mut self) {
        if let Some(init) = self.init {
            init(&mut self.state);
        }
    }

    fn responds_to(&self, method: &str) -> bool {
        self.actions.contains_key(method)
    }

    fn invoke(&self, method: &str, router: &Router, args: &[String]) -> Reply {
        match self.actions.get(method) {
            Some(action) => action(&self.state, router, args),
            None => Reply::internal_error(),
        }
    }
}

impl<S> fmt::Debug for ActionMap<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.actions.keys().collect();
        names.sort();
        f.debug_struct("ActionMap")
            .field("actions", &names)
            .field("has_init", &self.init.is_some())
            .finish()
    }
}
