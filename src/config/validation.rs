//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and value ranges
//! - Check the routing section fits the selected strategy
//! - In strict mode, compile every rule up front
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{AppConfig, RoutingStrategy};
use crate::routing::{PathPattern, VerbFilter};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("timeouts.request_secs must be greater than 0")]
    ZeroTimeout,

    #[error("routing.controller is required for the convention strategy")]
    MissingController,

    #[error("routing.rules must contain at least one rule for the table strategy")]
    NoRules,

    #[error("routing.rules[{index}]: {field} must not be empty")]
    EmptyField { index: usize, field: &'static str },

    #[error("routing.rules[{index}]: {reason}")]
    InvalidRule { index: usize, reason: String },
}

/// Validate `config`, collecting every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let routing = &config.routing;
    match routing.strategy {
        RoutingStrategy::Convention => {
            if routing.controller.as_deref().map_or(true, |c| c.trim().is_empty()) {
                errors.push(ValidationError::MissingController);
            }
        }
        RoutingStrategy::Table => {
            if routing.rules.is_empty() {
                errors.push(ValidationError::NoRules);
            }
        }
    }

    for (index, rule) in routing.rules.iter().enumerate() {
        if rule.handler.trim().is_empty() {
            errors.push(ValidationError::EmptyField { index, field: "handler" });
        }
        if rule.method.trim().is_empty() {
            errors.push(ValidationError::EmptyField { index, field: "method" });
        }

        if routing.strict {
            if let Err(e) = VerbFilter::parse_strict(&rule.verbs) {
                errors.push(ValidationError::InvalidRule { index, reason: e.to_string() });
            }
            if let Err(e) = PathPattern::compile(rule.pattern.as_str()) {
                errors.push(ValidationError::InvalidRule { index, reason: e.to_string() });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
