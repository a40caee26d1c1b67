//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (verb, path)
//!     → router.rs (per-request state)
//!     → table.rs (ordered rule scan) | convention.rs (path → method name)
//!     → matcher.rs (verb filter + anchored pattern)
//!     → target.rs (capture substitution, binding marker)
//!     → Return: ResolvedTarget or no match
//!
//! Rule Compilation (at startup):
//!     RuleConfig[] (file order)
//!     → RuleTableBuilder::add_rule
//!     → freeze() into immutable RuleTable
//!     → shared via Arc by all requests
//! ```
//!
//! # Design Decisions
//! - Rules compiled at startup, immutable at runtime
//! - Deterministic: same input always matches same rule
//! - First match wins (ordered by registration)

use std::sync::Arc;

use thiserror::Error;

pub mod convention;
pub mod matcher;
pub mod router;
pub mod table;
pub mod target;

pub use convention::ConventionMapper;
pub use matcher::{PathPattern, VerbFilter};
pub use router::{Router, Strategy};
pub use table::{Rule, RuleTable, RuleTableBuilder};
pub use target::{Binding, ResolvedTarget, TargetTemplate};

/// Errors raised while registering rules in strict mode.
#[derive(Debug, Error)]
pub enum RouteError {
    /// The path pattern is not a valid regular expression.
    #[error("invalid route pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    /// The verb list contains empty or malformed tokens.
    #[error("invalid verb list '{verbs}'")]
    InvalidVerb { verbs: String },
}

/// Where requests get their targets from.
#[derive(Debug, Clone)]
pub enum RouteSource {
    /// Ordered rule table.
    Table(Arc<RuleTable>),
    /// Path-derived method names on a single controller.
    Convention(ConventionMapper),
}

impl RouteSource {
    /// Freeze `builder` into a shared table source.
    pub fn table(builder: RuleTableBuilder) -> Self {
        RouteSource::Table(Arc::new(builder.freeze()))
    }

    pub fn convention(controller: impl Into<String>) -> Self {
        RouteSource::Convention(ConventionMapper::new(controller))
    }
}
