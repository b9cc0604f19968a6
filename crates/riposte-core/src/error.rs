//! Error types.
//!
//! Nothing in the attack path returns these to the caller. A malformed
//! override is logged and evicted, and the stage falls back to its built-in
//! formula. Configuration errors surface only when a host loads a config.

use thiserror::Error;

use crate::registry::{FormulaName, FormulaShape};

/// Errors raised by the formula registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A registered override does not have the callable shape its name requires.
    #[error(
        "formula override `{name}` from provider `{provider}` has shape {found}, expected {expected}"
    )]
    ShapeMismatch {
        /// Formula name that was looked up.
        name: FormulaName,
        /// Provider that installed the malformed entry.
        provider: String,
        /// Shape the caller required.
        expected: FormulaShape,
        /// Shape actually stored.
        found: FormulaShape,
    },
}

/// Errors raised while loading a [`CombatConfig`](crate::config::CombatConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    #[error("failed to parse combat config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A clamp range has its lower bound above its upper bound.
    #[error("invalid bounds for `{field}`: min {min} is greater than max {max}")]
    InvalidBounds {
        /// Config field holding the bounds.
        field: &'static str,
        /// Lower bound.
        min: i32,
        /// Upper bound.
        max: i32,
    },

    /// A scalar value is outside its accepted range.
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue {
        /// Config field.
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },
}
