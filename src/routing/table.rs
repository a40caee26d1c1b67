//! Ordered rule table.
//!
//! # Responsibilities
//! - Collect rules in registration order
//! - Freeze them into an immutable table shared by all requests
//! - Resolve `(verb, path)` to the target of the first matching rule
//!
//! # Design Decisions
//! - Rules can only be appended to a builder; the frozen table has no mutators
//! - Evaluation order is insertion order; first match wins
//! - Loose by default: bad patterns never match instead of failing registration

use crate::routing::matcher::{PathPattern, VerbFilter};
use crate::routing::target::{ResolvedTarget, TargetTemplate};
use crate::routing::RouteError;

/// A single routing rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pub verbs: VerbFilter,
    pub pattern: PathPattern,
    pub target: TargetTemplate,
}

impl Rule {
    /// Resolve this rule against a request, if it matches.
    pub fn resolve(&self, verb: &str, path: &str) -> Option<ResolvedTarget> {
        if !self.verbs.accepts(verb) {
            return None;
        }
        let m = self.pattern.matches(path)?;
        Some(self.target.resolve(&m))
    }
}

/// Collects rules before the table is frozen.
#[derive(Debug, Default)]
pub struct RuleTableBuilder {
    rules: Vec<Rule>,
    strict: bool,
}

impl RuleTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject invalid patterns and verb lists at registration time.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Append a rule.
    ///
    /// * `verbs` - comma separated verbs; empty or `*` accepts all.
    /// * `pattern` - regular expression matched against the whole path.
    /// * `handler`, `method`, `args` - target templates; `method` may carry a
    ///   `::` (static) or `->` (instance) marker.
    ///
    /// Only fails in strict mode.
    pub fn add_rule(
        &mut self,
        verbs: &str,
        pattern: &str,
        handler: &str,
        method: &str,
        args: &str,
    ) -> Result<&mut Self, RouteError> {
        let (verbs, pattern) = if self.strict {
            (VerbFilter::parse_strict(verbs)?, PathPattern::compile(pattern)?)
        } else {
            (VerbFilter::parse(verbs), PathPattern::compile_loose(pattern))
        };

        self.rules.push(Rule {
            verbs,
            pattern,
            target: TargetTemplate::new(handler, method, args),
        });
        Ok(self)
    }

    /// Number of rules added so far.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Finish registration.
    pub fn freeze(self) -> RuleTable {
        tracing::debug!(rules = self.rules.len(), strict = self.strict, "Rule table frozen");
        RuleTable { rules: self.rules }
    }
}

/// Immutable, ordered rule table.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    /// Rules in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Resolve a request to the target of the first matching rule.
    pub fn resolve(&self, verb: &str, path: &str) -> Option<ResolvedTarget> {
        self.rules.iter().enumerate().find_map(|(index, rule)| {
            let target = rule.resolve(verb, path)?;
            tracing::debug!(
                rule = index,
                pattern = %rule.pattern.as_str(),
                handler = %target.handler,
                method = %target.raw_method,
                "Route matched"
            );
            Some(target)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::target::Binding;

    fn table(rules: &[(&str, &str, &str, &str, &str)]) -> RuleTable {
        let mut builder = RuleTableBuilder::new();
        for (verbs, pattern, handler, method, args) in rules {
            builder.add_rule(verbs, pattern, handler, method, args).unwrap();
        }
        builder.freeze()
    }

    #[test]
    fn test_project_route() {
        let table = table(&[("GET,PUT", "/project/(id)/(action)", "ProjectHandler", "->$2", "$1")]);

        let target = table.resolve("GET", "/project/42/archive").unwrap();
        assert_eq!(target.handler, "ProjectHandler");
        assert_eq!(target.method, "archive");
        assert_eq!(target.binding, Binding::Instance);
        assert_eq!(target.args, vec!["42"]);

        assert!(table.resolve("put", "/project/42/archive").is_some());
        assert!(table.resolve("POST", "/project/42/archive").is_none());
    }

    #[test]
    fn test_wildcard_root_route() {
        let table = table(&[("*", "/", "HomeHandler", "->index", "")]);

        let target = table.resolve("POST", "/").unwrap();
        assert_eq!(target.handler, "HomeHandler");
        assert_eq!(target.method, "index");
        assert!(target.args.is_empty());
        assert!(table.resolve("POST", "/other").is_none());
    }

    #[test]
    fn test_first_match_wins() {
        let table = table(&[
            ("", r"/a/(\w+)", "First", "one", ""),
            ("", r"/a/b", "Second", "two", ""),
        ]);
        assert_eq!(table.resolve("GET", "/a/b").unwrap().handler, "First");
    }

    #[test]
    fn test_non_matching_rules_do_not_affect_result() {
        let target_rule = ("GET", r"/item/(\d+)", "Item", "show", "$1");
        let other = ("POST", r"/item/(\d+)", "Other", "create", "");
        let unrelated = ("", "/nope", "Nope", "x", "");

        let a = table(&[other, unrelated, target_rule]);
        let b = table(&[unrelated, target_rule, other]);
        assert_eq!(a.resolve("GET", "/item/3"), b.resolve("GET", "/item/3"));
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let table = table(&[("GET", "/x/(id)", "X", "::get", "$1")]);
        let first = table.resolve("GET", "/x/1");
        let second = table.resolve("GET", "/x/1");
        assert_eq!(first, second);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_shorthand_groups_are_wildcards() {
        let table = table(&[
            ("GET", "/(about)", "Page", "about", ""),
            ("GET", "/(contact)", "Page", "contact", ""),
            ("GET", "/(?:team)", "Page", "team", ""),
        ]);
        assert_eq!(table.resolve("GET", "/contact").unwrap().method, "about");

        let literal = table.rules()[2].resolve("GET", "/contact");
        assert!(literal.is_none());
    }

    #[test]
    fn test_pattern_reproducing_path_still_matches() {
        let table = table(&[("", "/same", "Same", "index", "/same")]);
        let target = table.resolve("GET", "/same").unwrap();
        assert_eq!(target.args, vec!["/same"]);
    }

    #[test]
    fn test_loose_mode_skips_broken_rule() {
        let table = table(&[
            ("GET", "/broken/(", "Broken", "x", ""),
            ("GET", "/broken/.*", "Fine", "y", ""),
        ]);
        assert_eq!(table.resolve("GET", "/broken/(").unwrap().handler, "Fine");
    }

    #[test]
    fn test_strict_mode_rejects_broken_rule() {
        let mut builder = RuleTableBuilder::new().strict(true);
        assert!(matches!(
            builder.add_rule("GET", "/broken/(", "Broken", "x", ""),
            Err(RouteError::InvalidPattern { .. })
        ));
        assert!(matches!(
            builder.add_rule("GET,,", "/", "Home", "x", ""),
            Err(RouteError::InvalidVerb { .. })
        ));
        assert!(builder.is_empty());
    }
}
