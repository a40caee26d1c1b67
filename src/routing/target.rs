//! Rule targets and their resolution.
//!
//! A [`TargetTemplate`] holds the handler, method and argument templates of a
//! rule. Resolving it against a [`PathMatch`] substitutes `$N`, `${N}` and
//! `${name}` placeholders and produces a [`ResolvedTarget`].

use serde::Serialize;

use crate::routing::matcher::PathMatch;

/// Marker prefix selecting a call without instantiation.
pub const STATIC_MARKER: &str = "::";

/// Marker prefix selecting a call on a fresh instance.
pub const INSTANCE_MARKER: &str = "->";

/// How the dispatcher obtains the handler it invokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Binding {
    /// Use the shared handler; nothing is instantiated.
    Static,
    /// Build a fresh handler for this request.
    Instance,
}

impl Binding {
    /// Split a method reference into its binding and bare method name.
    ///
    /// `"::index"` is static, `"->index"` and `"index"` are instance calls.
    pub fn split(method: &str) -> (Binding, &str) {
        let method = method.trim();
        if let Some(name) = method.strip_prefix(STATIC_MARKER) {
            (Binding::Static, name)
        } else if let Some(name) = method.strip_prefix(INSTANCE_MARKER) {
            (Binding::Instance, name)
        } else {
            (Binding::Instance, method)
        }
    }
}

/// The handler, method and arguments a request resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTarget {
    /// Handler identifier, looked up in the handler registry.
    pub handler: String,
    /// Method reference as resolved, binding marker included.
    pub raw_method: String,
    /// Method name used for invocation.
    pub method: String,
    /// Invocation strategy selected by the marker.
    pub binding: Binding,
    /// Positional string arguments passed after the router.
    pub args: Vec<String>,
}

impl ResolvedTarget {
    /// Build a target from an already substituted method reference.
    pub fn new(handler: impl Into<String>, raw_method: impl Into<String>, args: Vec<String>) -> Self {
        let raw_method = raw_method.into();
        let (binding, method) = Binding::split(&raw_method);
        let method = method.to_string();
        Self {
            handler: handler.into(),
            raw_method,
            method,
            binding,
            args,
        }
    }
}

/// Unresolved target of a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetTemplate {
    pub handler: String,
    pub method: String,
    pub args: String,
}

impl TargetTemplate {
    pub fn new(handler: impl Into<String>, method: impl Into<String>, args: impl Into<String>) -> Self {
        Self {
            handler: handler.into(),
            method: method.into(),
            args: args.into(),
        }
    }

    /// Substitute the captures of `m` into all three templates.
    pub fn resolve(&self, m: &PathMatch<'_>) -> ResolvedTarget {
        let handler = expand(&self.handler, m);
        let method = expand(&self.method, m);
        let args = split_args(&expand(&self.args, m));
        ResolvedTarget::new(handler, method, args)
    }
}

/// Split a comma separated argument list, trimming each piece.
pub fn split_args(args: &str) -> Vec<String> {
    if args.trim().is_empty() {
        return Vec::new();
    }
    args.split(',').map(|arg| arg.trim().to_string()).collect()
}

/// Replace placeholders in `template` with captures.
///
/// Placeholders naming a group the pattern does not have stay as written.
pub(crate) fn expand(template: &str, m: &PathMatch<'_>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        match placeholder(after, m) {
            Some((value, consumed)) => {
                out.push_str(value);
                rest = &after[consumed..];
            }
            None => {
                out.push('$');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Value and length of the placeholder at the start of `s` (just after `$`).
fn placeholder<'a>(s: &str, m: &PathMatch<'a>) -> Option<(&'a str, usize)> {
    if let Some(braced) = s.strip_prefix('{') {
        let end = braced.find('}')?;
        let key = &braced[..end];
        let value = match key.parse::<usize>() {
            Ok(index) => m.group(index),
            Err(_) => m.named(key),
        }?;
        return Some((value, end + 2));
    }

    let digits = s.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let index = s[..digits].parse::<usize>().ok()?;
    m.group(index).map(|value| (value, digits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::matcher::PathPattern;

    fn resolve(pattern: &str, path: &str, target: TargetTemplate) -> ResolvedTarget {
        let pattern = PathPattern::compile(pattern).unwrap();
        let m = pattern.matches(path).expect("pattern should match");
        target.resolve(&m)
    }

    #[test]
    fn test_binding_markers() {
        assert_eq!(Binding::split("::index"), (Binding::Static, "index"));
        assert_eq!(Binding::split("->index"), (Binding::Instance, "index"));
        assert_eq!(Binding::split("index"), (Binding::Instance, "index"));
    }

    #[test]
    fn test_positional_substitution() {
        let target = resolve(
            r"/(\w+)/(\w+)",
            "/project/archive",
            TargetTemplate::new("$1Handler", "->$2", "$1, x, $2"),
        );
        assert_eq!(target.handler, "projectHandler");
        assert_eq!(target.raw_method, "->archive");
        assert_eq!(target.method, "archive");
        assert_eq!(target.binding, Binding::Instance);
        assert_eq!(target.args, vec!["project", "x", "archive"]);
    }

    #[test]
    fn test_braced_and_named_substitution() {
        let target = resolve(
            "/user/(id)",
            "/user/7",
            TargetTemplate::new("User", "::show", "${id}, ${1}0, $0"),
        );
        assert_eq!(target.binding, Binding::Static);
        assert_eq!(target.args, vec!["7", "70", "/user/7"]);
    }

    #[test]
    fn test_unsatisfied_placeholders_stay_literal() {
        let target = resolve(
            "/user/(id)",
            "/user/7",
            TargetTemplate::new("User", "show", "$1, $5, ${name}, $, cost$"),
        );
        assert_eq!(target.args, vec!["7", "$5", "${name}", "$", "cost$"]);
    }

    #[test]
    fn test_split_args() {
        assert!(split_args("").is_empty());
        assert!(split_args("   ").is_empty());
        assert_eq!(split_args(" a ,b,  c"), vec!["a", "b", "c"]);
        assert_eq!(split_args("a,,b"), vec!["a", "", "b"]);
    }
}
