//! # Configuration Validation
//!
//! Every configurable component describes its own constraints through the
//! [`Validate`] trait. Validation is explicit: it runs when a component is
//! constructed and again when the algorithm is built, and reports every
//! violation at once instead of stopping at the first.

use std::fmt;

use crate::error::{GeneticError, Result};

/// One invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigViolation {
    /// The component the value belongs to.
    pub component: &'static str,
    /// The name of the offending property.
    pub property: &'static str,
    pub message: String,
}

impl ConfigViolation {
    pub fn new(
        component: &'static str,
        property: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            component,
            property,
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}: {}", self.component, self.property, self.message)
    }
}

/// Reports the configuration violations of a component.
pub trait Validate {
    /// Returns every violation. An empty list means the configuration is valid.
    fn validate(&self) -> Vec<ConfigViolation>;
}

/// Turns a list of violations into a `Configuration` error, if there are any.
pub fn ensure_valid(violations: Vec<ConfigViolation>) -> Result<()> {
    if violations.is_empty() {
        return Ok(());
    }

    let message = violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    Err(GeneticError::Configuration(message))
}

/// Checks that a rate lies within `[0, 1]`.
pub(crate) fn check_rate(
    component: &'static str,
    property: &'static str,
    value: f64,
) -> Option<ConfigViolation> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        None
    } else {
        Some(ConfigViolation::new(
            component,
            property,
            format!("must be within [0, 1], got {}", value),
        ))
    }
}
