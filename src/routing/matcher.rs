//! Rule matching logic.
//!
//! # Responsibilities
//! - Match the request verb against a rule's verb filter (case-insensitive)
//! - Match the request path against a rule's pattern (regex, whole path)
//! - Expose positional and named captures for template substitution
//!
//! # Design Decisions
//! - Empty verb list or `*` = always matches (wildcard)
//! - Patterns are implicitly anchored at both ends
//! - `(name)` is shorthand for a single-segment named capture, so `/(about)`
//!   matches any one segment; write `/about` or `/(?:about)` for the literal
//! - A repeated shorthand name becomes a positional-only capture
//! - Both conditions must hold (AND semantics); verbs are checked first

use std::collections::HashSet;

use axum::http::Method;
use regex::{Captures, Regex};

use crate::routing::RouteError;

/// The set of HTTP verbs a rule accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerbFilter {
    /// Accepts every verb.
    Any,
    /// Accepts only the listed verbs (stored upper-cased).
    Only(Vec<String>),
}

impl VerbFilter {
    /// Parse a comma separated verb list such as `"GET, PUT"`.
    ///
    /// An empty list, a blank list or any `*` token yields [`VerbFilter::Any`].
    pub fn parse(verbs: &str) -> Self {
        let tokens: Vec<String> = verbs
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_ascii_uppercase)
            .collect();

        if tokens.is_empty() || tokens.iter().any(|token| token.contains('*')) {
            VerbFilter::Any
        } else {
            VerbFilter::Only(tokens)
        }
    }

    /// Like [`VerbFilter::parse`], but rejects tokens that are not valid HTTP methods.
    pub fn parse_strict(verbs: &str) -> Result<Self, RouteError> {
        let filter = Self::parse(verbs);
        let has_empty_token = verbs.contains(',') && verbs.split(',').any(|t| t.trim().is_empty());
        let invalid = match &filter {
            VerbFilter::Any => false,
            VerbFilter::Only(tokens) => tokens
                .iter()
                .any(|token| Method::from_bytes(token.as_bytes()).is_err()),
        };

        if has_empty_token || invalid {
            return Err(RouteError::InvalidVerb {
                verbs: verbs.to_string(),
            });
        }
        Ok(filter)
    }

    /// Returns true if `verb` passes this filter.
    pub fn accepts(&self, verb: &str) -> bool {
        match self {
            VerbFilter::Any => true,
            VerbFilter::Only(tokens) => tokens.iter().any(|token| token.eq_ignore_ascii_case(verb)),
        }
    }
}

/// A compiled path pattern.
///
/// A pattern that failed to compile is kept (so the table still lists it)
/// but never matches.
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    regex: Option<Regex>,
}

impl PathPattern {
    /// Compile a pattern, failing on invalid syntax.
    pub fn compile(source: impl Into<String>) -> Result<Self, RouteError> {
        let source = source.into();
        let regex = Regex::new(&anchored(&source)).map_err(|e| RouteError::InvalidPattern {
            pattern: source.clone(),
            source: e,
        })?;
        Ok(Self {
            source,
            regex: Some(regex),
        })
    }

    /// Compile a pattern without failing. Invalid patterns are logged and never match.
    pub fn compile_loose(source: impl Into<String>) -> Self {
        let source = source.into();
        match Regex::new(&anchored(&source)) {
            Ok(regex) => Self {
                source,
                regex: Some(regex),
            },
            Err(e) => {
                tracing::warn!(pattern = %source, error = %e, "Route pattern does not compile; rule will never match");
                Self { source, regex: None }
            }
        }
    }

    /// The pattern as written in the rule.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the pattern compiled.
    pub fn is_valid(&self) -> bool {
        self.regex.is_some()
    }

    /// Match the whole `path`, returning its captures.
    pub fn matches<'a>(&'a self, path: &'a str) -> Option<PathMatch<'a>> {
        let regex = self.regex.as_ref()?;
        regex
            .captures(path)
            .map(|captures| PathMatch { captures, regex })
    }
}

/// Captures of a successful path match.
#[derive(Debug)]
pub struct PathMatch<'a> {
    captures: Captures<'a>,
    regex: &'a Regex,
}

impl<'a> PathMatch<'a> {
    /// Positional capture. `None` if the pattern has no such group; an empty
    /// string if the group exists but did not take part in the match.
    pub fn group(&self, index: usize) -> Option<&'a str> {
        if index >= self.captures.len() {
            return None;
        }
        Some(self.captures.get(index).map_or("", |m| m.as_str()))
    }

    /// Named capture, with the same conventions as [`PathMatch::group`].
    pub fn named(&self, name: &str) -> Option<&'a str> {
        if !self.regex.capture_names().any(|n| n == Some(name)) {
            return None;
        }
        Some(self.captures.name(name).map_or("", |m| m.as_str()))
    }
}

fn anchored(source: &str) -> String {
    format!("^(?:{})$", expand_segment_captures(source))
}

/// Rewrite `(ident)` groups into `(?P<ident>[^/]+)`.
///
/// Later uses of a name already taken become `([^/]+)`. Escaped parentheses
/// and parentheses inside character classes are left alone.
fn expand_segment_captures(pattern: &str) -> String {
    let bytes = pattern.as_bytes();
    let mut names = HashSet::new();
    let mut out = String::with_capacity(pattern.len() + 16);
    let mut last = 0;
    let mut i = 0;
    let mut escaped = false;
    let mut in_class = false;

    while i < bytes.len() {
        let b = bytes[i];
        if escaped {
            escaped = false;
        } else if b == b'\\' {
            escaped = true;
        } else if in_class {
            if b == b']' {
                in_class = false;
            }
        } else if b == b'[' {
            in_class = true;
        } else if b == b'(' {
            let ident_len = identifier_len(&bytes[i + 1..]);
            if ident_len > 0 && bytes.get(i + 1 + ident_len) == Some(&b')') {
                let name = &pattern[i + 1..i + 1 + ident_len];
                out.push_str(&pattern[last..i]);
                if names.insert(name) {
                    out.push_str(&format!("(?P<{}>[^/]+)", name));
                } else {
                    out.push_str("([^/]+)");
                }
                i += ident_len + 2;
                last = i;
                continue;
            }
        }
        i += 1;
    }

    out.push_str(&pattern[last..]);
    out
}

fn identifier_len(bytes: &[u8]) -> usize {
    match bytes.first() {
        Some(b) if b.is_ascii_alphabetic() || *b == b'_' => bytes
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
            .count(),
        _ => 0,
    }
}
