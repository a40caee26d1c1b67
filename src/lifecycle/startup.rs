//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the route source from validated configuration
//! - Build the dispatcher around a handler registry
//! - Report rules naming handlers nothing is registered for
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Routes are complete before the listener accepts traffic
//! - Handler ids containing placeholders are only known per request

use thiserror::Error;

use crate::config::{RoutingConfig, RoutingStrategy};
use crate::dispatch::builtin::{EchoHandler, ECHO_HANDLER};
use crate::dispatch::{Dispatcher, HandlerRegistry};
use crate::routing::{RouteError, RouteSource, RuleTableBuilder};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Route(#[from] RouteError),

    #[error("the convention strategy needs a controller")]
    MissingController,
}

/// Build the route source selected by `routing.strategy`.
pub fn build_route_source(routing: &RoutingConfig) -> Result<RouteSource, StartupError> {
    match routing.strategy {
        RoutingStrategy::Convention => {
            let controller = routing
                .controller
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .ok_or(StartupError::MissingController)?;
            tracing::info!(controller = %controller, "Convention routing enabled");
            Ok(RouteSource::convention(controller))
        }
        RoutingStrategy::Table => {
            let mut builder = RuleTableBuilder::new().strict(routing.strict);
            for rule in &routing.rules {
                builder.add_rule(&rule.verbs, &rule.pattern, &rule.handler, &rule.method, &rule.args)?;
            }
            tracing::info!(rules = builder.len(), strict = routing.strict, "Rule table built");
            Ok(RouteSource::table(builder))
        }
    }
}

/// Build the dispatcher, warning about handlers missing from `registry`.
pub fn build_dispatcher(routing: &RoutingConfig, registry: HandlerRegistry) -> Dispatcher {
    let literal_ids = routing
        .rules
        .iter()
        .map(|rule| rule.handler.as_str())
        .chain(routing.controller.as_deref())
        .chain(routing.fallback_handler.as_deref())
        .filter(|id| !id.contains('$'));

    for id in literal_ids {
        if !registry.contains(id) {
            tracing::warn!(handler = %id, "No handler registered under this id");
        }
    }

    let dispatcher = Dispatcher::new(registry);
    match &routing.fallback_handler {
        Some(fallback) => dispatcher.with_fallback(fallback.clone()),
        None => dispatcher,
    }
}

/// Registry with the handlers the server binary ships with.
pub fn default_registry() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    registry
        .register_shared(ECHO_HANDLER, EchoHandler)
        .register_factory(ECHO_HANDLER, || EchoHandler);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleConfig;
    use crate::routing::{Router, Strategy};

    fn echo_rule(pattern: &str, method: &str) -> RuleConfig {
        RuleConfig {
            verbs: String::new(),
            pattern: pattern.into(),
            handler: ECHO_HANDLER.into(),
            method: method.into(),
            args: String::new(),
        }
    }

    #[test]
    fn test_table_source_keeps_rule_order() {
        let routing = RoutingConfig {
            rules: vec![echo_rule("/a", "::first"), echo_rule("/(x)", "::second")],
            ..Default::default()
        };
        let source = build_route_source(&routing).unwrap();
        let router = Router::resolve(&source, "GET", "/a");
        assert_eq!(router.strategy(), Strategy::Table);
        assert_eq!(router.target().unwrap().method, "first");
    }

    #[test]
    fn test_strict_rejects_bad_pattern() {
        let routing = RoutingConfig {
            strict: true,
            rules: vec![echo_rule("/broken/(", "::m")],
            ..Default::default()
        };
        assert!(matches!(
            build_route_source(&routing),
            Err(StartupError::Route(RouteError::InvalidPattern { .. }))
        ));
    }

    #[test]
    fn test_convention_needs_controller() {
        let mut routing = RoutingConfig {
            strategy: RoutingStrategy::Convention,
            controller: Some("  ".into()),
            ..Default::default()
        };
        assert!(matches!(build_route_source(&routing), Err(StartupError::MissingController)));

        routing.controller = Some(ECHO_HANDLER.into());
        let source = build_route_source(&routing).unwrap();
        let router = Router::resolve(&source, "GET", "/foo-bar");
        assert_eq!(router.target().unwrap().method, "fooBar");
    }

    #[test]
    fn test_dispatcher_uses_configured_fallback() {
        let routing = RoutingConfig {
            fallback_handler: Some(ECHO_HANDLER.into()),
            rules: vec![echo_rule("/", "->index")],
            ..Default::default()
        };
        let source = build_route_source(&routing).unwrap();
        let dispatcher = build_dispatcher(&routing, default_registry());

        let invocation = dispatcher
            .dispatch(&Router::resolve(&source, "GET", "/missing"))
            .unwrap();
        assert!(invocation.is_fallback());
        assert_eq!(invocation.reply.status.as_u16(), 404);
    }

    #[test]
    fn test_default_registry_has_both_bindings() {
        let registry = default_registry();
        assert!(registry.contains(ECHO_HANDLER));
        assert!(registry.acquire(ECHO_HANDLER, crate::routing::Binding::Static).is_some());
        assert!(registry.acquire(ECHO_HANDLER, crate::routing::Binding::Instance).is_some());
    }
}
