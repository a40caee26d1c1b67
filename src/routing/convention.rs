//! Convention based routing for single-controller applications.
//!
//! Mapping rules:
//!
//! ```text
//!   path           => method
//!   /              => index
//!   /foo           => foo
//!   /foo-bar       => fooBar
//!   /foo/bar       => foo_bar
//!   /foo/foo-bar   => foo_fooBar
//! ```

use crate::routing::target::{ResolvedTarget, STATIC_MARKER};

/// Method used for the root path.
pub const INDEX_METHOD: &str = "index";

/// Derives method names from paths; all requests go to one controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionMapper {
    controller: String,
}

impl ConventionMapper {
    pub fn new(controller: impl Into<String>) -> Self {
        Self {
            controller: controller.into(),
        }
    }

    /// The controller every request is dispatched to.
    pub fn controller(&self) -> &str {
        &self.controller
    }

    /// Resolve a path to a static call on the controller, without arguments.
    pub fn resolve(&self, path: &str) -> ResolvedTarget {
        let method = Self::method_for(path);
        ResolvedTarget::new(
            self.controller.clone(),
            format!("{}{}", STATIC_MARKER, method),
            Vec::new(),
        )
    }

    /// Derive the method name for `path`.
    pub fn method_for(path: &str) -> String {
        let path = path.split('?').next().unwrap_or_default();
        let method = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| {
                if segment.contains('-') {
                    camel_case(segment)
                } else {
                    segment.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("_");

        if method.is_empty() {
            INDEX_METHOD.to_string()
        } else {
            method
        }
    }
}

fn camel_case(segment: &str) -> String {
    let joined: String = segment.split('-').map(upper_first).collect();
    lower_first(&joined)
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
