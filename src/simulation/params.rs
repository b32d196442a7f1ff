//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - fixed timestep `dt` and the softening length,
//! - which integrator the engine builds,
//! - tolerance and step bounds for the adaptive RK45 integrator
//!
//! It is passed into `NBodySimulation::new` instead of living in a global.

use crate::configuration::config::{IntegratorConfig, SettingsSchema};
use crate::error::{PhysicsError, PhysicsResult};

use super::constants::{DT, SOFTENING_LENGTH};

#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub dt: f64, // seconds per tick
    pub softening: f64, // gravitational softening length, m
    pub integrator: IntegratorConfig, // verlet or rk45
    pub tolerance: f64, // rk45 position error tolerance, m
    pub min_dt: f64, // rk45 step floor, s
    pub max_dt: f64, // rk45 step ceiling, s
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            dt: DT,
            softening: SOFTENING_LENGTH,
            integrator: IntegratorConfig::Verlet,
            tolerance: 1e-9,
            min_dt: 1e-4,
            max_dt: 3600.0,
        }
    }
}

impl Parameters {
    pub fn with_integrator(mut self, integrator: IntegratorConfig) -> Self {
        self.integrator = integrator;
        self
    }

    pub fn with_dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    /// Defaults overridden by whatever the schema settings provide
    pub fn from_settings(settings: &SettingsSchema) -> Self {
        let d = Self::default();
        Self {
            dt: settings.dt.unwrap_or(d.dt),
            softening: settings.softening.unwrap_or(d.softening),
            integrator: settings.integrator.unwrap_or(d.integrator),
            tolerance: settings.tolerance.unwrap_or(d.tolerance),
            min_dt: settings.min_dt.unwrap_or(d.min_dt),
            max_dt: settings.max_dt.unwrap_or(d.max_dt),
        }
    }

    pub fn validate(&self) -> PhysicsResult<()> {
        let positive = [
            ("dt", self.dt),
            ("softening", self.softening),
            ("tolerance", self.tolerance),
            ("min_dt", self.min_dt),
            ("max_dt", self.max_dt),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(PhysicsError::parameter(
                    name,
                    format!("must be positive and finite, got {value}"),
                ));
            }
        }
        if self.min_dt > self.max_dt {
            return Err(PhysicsError::parameter(
                "min_dt",
                format!("{} exceeds max_dt {}", self.min_dt, self.max_dt),
            ));
        }
        Ok(())
    }
}
