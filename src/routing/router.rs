//! Per-request routing state.
//!
//! # Responsibilities
//! - Resolve the request against the configured route source once
//! - Hold verb, path and resolved target for the lifetime of the request
//! - Give handlers a back-reference to routing state (and the rule table)
//!
//! # Design Decisions
//! - One `Router` per request; never shared between requests
//! - The resolved target is never rewritten, fallbacks are reported by the dispatcher
//! - Explicit `None` target rather than a silent default

use std::sync::Arc;

use crate::routing::table::RuleTable;
use crate::routing::target::ResolvedTarget;
use crate::routing::RouteSource;

/// Which resolution strategy produced the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Table,
    Convention,
}

/// Routing state of a single request, passed to every handler invocation.
#[derive(Debug, Clone)]
pub struct Router {
    verb: String,
    path: String,
    target: Option<ResolvedTarget>,
    table: Option<Arc<RuleTable>>,
    strategy: Strategy,
}

impl Router {
    /// Resolve `verb` and `path` against `source`.
    pub fn resolve(source: &RouteSource, verb: &str, path: &str) -> Self {
        match source {
            RouteSource::Table(table) => Self::from_table(Arc::clone(table), verb, path),
            RouteSource::Convention(mapper) => Self {
                verb: verb.to_string(),
                path: path.to_string(),
                target: Some(mapper.resolve(path)),
                table: None,
                strategy: Strategy::Convention,
            },
        }
    }

    /// Resolve against a rule table.
    pub fn from_table(table: Arc<RuleTable>, verb: &str, path: &str) -> Self {
        let target = table.resolve(verb, path);
        if target.is_none() {
            tracing::debug!(verb = %verb, path = %path, rules = table.len(), "No route matched");
        }
        Self {
            verb: verb.to_string(),
            path: path.to_string(),
            target,
            table: Some(table),
            strategy: Strategy::Table,
        }
    }

    /// The raw request verb.
    pub fn verb(&self) -> &str {
        &self.verb
    }

    /// The request path, without query.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The resolved target, `None` if no rule matched.
    pub fn target(&self) -> Option<&ResolvedTarget> {
        self.target.as_ref()
    }

    /// The rule table, when routing by table.
    pub fn table(&self) -> Option<&RuleTable> {
        self.table.as_deref()
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }
}
