//! Error types for the physics core
//!
//! Every fallible operation in the library returns [`PhysicsResult`].
//! Numerical corruption is never clamped or logged-and-ignored: it surfaces
//! here and propagates to the host unchanged.

use thiserror::Error;

/// Result alias used throughout the crate
pub type PhysicsResult<T> = Result<T, PhysicsError>;

#[derive(Debug, Error)]
pub enum PhysicsError {
    /// A vector component went NaN or infinite
    #[error("non-finite value in {context}.{component}: {value}")]
    NonFinite {
        context: String, // logical field, e.g. "earth.position"
        component: char, // 'x', 'y' or 'z'
        value: f64,
    },

    /// Body rejected at the boundary, all failed checks aggregated
    #[error("invalid body: {}", .0.join(", "))]
    InvalidBody(Vec<String>),

    #[error("body '{0}' already exists")]
    DuplicateBody(String),

    /// Gravity sum produced NaN/Infinity, upstream state is corrupted
    #[error("NaN/Infinity in acceleration for body {0}")]
    DivergentAcceleration(String),

    /// Snapshot failed the full-state check
    #[error("invalid state in {context}: {message}")]
    InvalidState { context: String, message: String },

    /// Tunable parameter outside its allowed range
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter { name: &'static str, message: String },

    #[error("division by zero scalar")]
    DivisionByZero,

    /// Schema is well-formed YAML but semantically broken
    #[error("malformed schema: {0}")]
    Schema(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PhysicsError {
    pub(crate) fn parameter(name: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            message: message.into(),
        }
    }

    pub(crate) fn state(context: &str, message: impl Into<String>) -> Self {
        Self::InvalidState {
            context: context.to_string(),
            message: message.into(),
        }
    }
}
