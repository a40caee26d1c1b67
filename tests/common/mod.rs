//! Shared utilities for integration tests.

use std::net::SocketAddr;

use axum::http::StatusCode;
use tokio::net::TcpListener;

use http_dispatch::config::{parse_config, AppConfig};
use http_dispatch::dispatch::{ActionMap, HandlerRegistry, NOT_FOUND_METHOD};
use http_dispatch::http::{HttpServer, Reply};
use http_dispatch::lifecycle::{build_dispatcher, build_route_source, Shutdown};

/// State of the `Project` test handler.
#[derive(Default)]
pub struct Project {
    pub loaded: bool,
}

/// `Project` handler: `show`, `archive` and `http404`.
pub fn project() -> ActionMap<Project> {
    ActionMap::new(Project::default())
        .on_init(|state| state.loaded = true)
        .action("show", |state, _, args| {
            Reply::text(format!("show {} loaded={}", args.join(","), state.loaded))
        })
        .action("archive", |_, _, args| Reply::text(format!("archived {}", args.join(","))))
        .action(NOT_FOUND_METHOD, |_, router, _| {
            Reply::new(StatusCode::NOT_FOUND, format!("project 404 {}", router.path()))
        })
}

/// `Home` handler: `index` and `http404`.
pub fn home() -> ActionMap<()> {
    ActionMap::new(())
        .action("index", |_, _, _| Reply::text("home"))
        .action(NOT_FOUND_METHOD, |_, router, _| {
            Reply::new(StatusCode::NOT_FOUND, format!("home 404 {}", router.path()))
        })
}

/// Registry with `Project` (instance only) and `Home` (both bindings).
pub fn registry() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    registry
        .register_factory("Project", project)
        .register_shared("Home", home())
        .register_factory("Home", home);
    registry
}

/// Parse a test configuration.
#[allow(dead_code)]
pub fn config(toml: &str) -> AppConfig {
    parse_config(toml).unwrap()
}

/// HTTP client that never goes through an environment proxy.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// A running server; dropping it shuts the server down.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    _shutdown: Shutdown,
}

#[allow(dead_code)]
impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start a server on an ephemeral port.
#[allow(dead_code)]
pub async fn spawn_server(config: AppConfig, registry: HandlerRegistry) -> TestServer {
    let routes = build_route_source(&config.routing).unwrap();
    let dispatcher = build_dispatcher(&config.routing, registry);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();
    let server = HttpServer::new(config, routes, dispatcher);
    tokio::spawn(async move {
        let _ = server.run(listener, signal).await;
    });

    TestServer { addr, _shutdown: shutdown }
}
