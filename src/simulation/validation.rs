//! Boundary guards against non-finite and out-of-range numeric state
//!
//! Scalar and body checks return a [`ValidationResult`] so several failures
//! can be reported together. [`assert_valid_state`] is the hard gate used on
//! whole snapshots and turns any failure into an error.

use crate::error::{PhysicsError, PhysicsResult};

use super::states::{CelestialBody, SimulationState};
use super::vector::Vector3D;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            errors: vec![message.into()],
        }
    }

    /// Fold another result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        self.valid &= other.valid;
        self.errors.extend(other.errors);
    }

    /// Convert to an error carrying every collected message
    pub fn into_result(self) -> PhysicsResult<()> {
        if self.valid {
            Ok(())
        } else {
            Err(PhysicsError::InvalidBody(self.errors))
        }
    }
}

pub fn validate_finite(value: f64, name: &str) -> ValidationResult {
    if value.is_finite() {
        ValidationResult::ok()
    } else {
        ValidationResult::fail(format!("{name} must be finite, got {value}"))
    }
}

pub fn validate_positive(value: f64, name: &str) -> ValidationResult {
    if value.is_finite() && value > 0.0 {
        ValidationResult::ok()
    } else {
        ValidationResult::fail(format!("{name} must be positive and finite, got {value}"))
    }
}

pub fn validate_non_negative(value: f64, name: &str) -> ValidationResult {
    if value.is_finite() && value >= 0.0 {
        ValidationResult::ok()
    } else {
        ValidationResult::fail(format!("{name} must be non-negative and finite, got {value}"))
    }
}

/// Finiteness of all three components
pub fn validate_vector(v: &Vector3D, name: &str) -> ValidationResult {
    let mut result = ValidationResult::ok();
    result.merge(validate_finite(v.x(), &format!("{name}.x")));
    result.merge(validate_finite(v.y(), &format!("{name}.y")));
    result.merge(validate_finite(v.z(), &format!("{name}.z")));
    result
}

pub fn validate_body(body: &CelestialBody) -> ValidationResult {
    let mut result = ValidationResult::ok();
    if body.id.trim().is_empty() {
        result.merge(ValidationResult::fail("body id is required"));
    }
    let label = if body.id.is_empty() { "<unnamed>" } else { body.id.as_str() };
    result.merge(validate_positive(body.mass, &format!("{label}.mass")));
    result.merge(validate_positive(body.radius, &format!("{label}.radius")));
    result.merge(validate_vector(&body.position, &format!("{label}.position")));
    result.merge(validate_vector(&body.velocity, &format!("{label}.velocity")));
    result
}

/// Reject a snapshot with a non-finite clock or any invalid body
pub fn assert_valid_state(state: &SimulationState, context: &str) -> PhysicsResult<()> {
    if !state.time.is_finite() {
        return Err(PhysicsError::state(
            context,
            format!("simulation time is not finite ({})", state.time),
        ));
    }
    for body in &state.bodies {
        let result = validate_body(body);
        if !result.valid {
            return Err(PhysicsError::state(
                context,
                format!("body '{}': {}", body.id, result.errors.join(", ")),
            ));
        }
    }
    Ok(())
}
