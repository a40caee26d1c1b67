//! Handlers shipped with the server binary.

use axum::http::StatusCode;
use serde_json::json;

use crate::dispatch::handler::{Handler, NOT_FOUND_METHOD};
use crate::http::Reply;
use crate::routing::Router;

/// Identifier the server registers [`EchoHandler`] under.
pub const ECHO_HANDLER: &str = "Echo";

/// Answers every method with a JSON description of the routing outcome.
///
/// Useful for checking a rule table against live traffic before real
/// handlers exist. `http404` answers with a 404.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoHandler;

impl Handler for EchoHandler {
    fn responds_to(&self, _method: &str) -> bool {
        true
    }

    fn invoke(&self, method: &str, router: &Router, args: &[String]) -> Reply {
        if method == NOT_FOUND_METHOD {
            return Reply::json(
                StatusCode::NOT_FOUND,
                &json!({
                    "error": "not found",
                    "verb": router.verb(),
                    "path": router.path(),
                }),
            );
        }

        Reply::json(
            StatusCode::OK,
            &json!({
                "verb": router.verb(),
                "path": router.path(),
                "method": method,
                "args": args,
                "target": router.target(),
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::RouteSource;

    #[test]
    fn test_echo_describes_target() {
        let source = RouteSource::convention(ECHO_HANDLER);
        let router = Router::resolve(&source, "GET", "/foo-bar");
        let target = router.target().unwrap();

        let reply = EchoHandler.invoke(&target.method, &router, &target.args);
        assert_eq!(reply.status, StatusCode::OK);

        let body: serde_json::Value = serde_json::from_str(&reply.body).unwrap();
        assert_eq!(body["method"], "fooBar");
        assert_eq!(body["target"]["binding"], "static");
        assert_eq!(body["target"]["raw_method"], "::fooBar");
    }

    #[test]
    fn test_echo_not_found() {
        let source = RouteSource::convention(ECHO_HANDLER);
        let router = Router::resolve(&source, "GET", "/nope");
        let reply = EchoHandler.invoke(NOT_FOUND_METHOD, &router, &[]);
        assert_eq!(reply.status, StatusCode::NOT_FOUND);
    }
}
