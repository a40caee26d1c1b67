//! HTTP request routing and dispatch library.

pub mod config;
pub mod dispatch;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::AppConfig;
pub use dispatch::{Dispatcher, Handler, HandlerRegistry};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{RouteSource, Router, RuleTableBuilder};
