//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → lifecycle::startup builds the route source from it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the rule table is built from it once
//! - All fields have defaults to allow minimal configs
//! - Rules keep file order; it is their evaluation order
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    AppConfig, ListenerConfig, LogFormat, ObservabilityConfig, RoutingConfig, RoutingStrategy,
    RuleConfig, TimeoutConfig,
};
pub use validation::ValidationError;
