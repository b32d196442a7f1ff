//! Physical constants and the body taxonomy
//!
//! Everything is SI: meters, kilograms, seconds.

use serde::{Deserialize, Serialize};

/// Gravitational constant, m^3 / (kg s^2)
pub const G: f64 = 6.67430e-11;

/// Softening length in meters; keeps 1/d^2 bounded as d -> 0
pub const SOFTENING_LENGTH: f64 = 1000.0;

/// Fixed physics tick rate
pub const PHYSICS_HZ: f64 = 60.0;

/// Timestep derived from the tick rate, seconds
pub const DT: f64 = 1.0 / PHYSICS_HZ;

// Astronomical reference values
pub const AU: f64 = 1.495978707e11;
pub const SOLAR_MASS: f64 = 1.98892e30;
pub const SOLAR_RADIUS: f64 = 6.9634e8;
pub const EARTH_MASS: f64 = 5.9722e24;
pub const EARTH_RADIUS: f64 = 6.371e6;
pub const MOON_MASS: f64 = 7.342e22;
pub const MOON_RADIUS: f64 = 1.7374e6;

// Time units, seconds
pub const MINUTE: f64 = 60.0;
pub const HOUR: f64 = 3600.0;
pub const DAY: f64 = 86400.0;
pub const YEAR: f64 = 31557600.0;

/// Closed set of body kinds
///
/// Massive kinds pull on everything; passive kinds are pulled but never pull
/// back, so each passive body costs O(massive) per step instead of O(n).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BodyType {
    Star,
    Planet,
    Moon,
    Ship,
    Asteroid,
}

impl BodyType {
    pub fn is_massive(self) -> bool {
        is_massive(self)
    }
}

/// True only for stars, planets and moons
pub fn is_massive(kind: BodyType) -> bool {
    matches!(kind, BodyType::Star | BodyType::Planet | BodyType::Moon)
}

impl std::fmt::Display for BodyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BodyType::Star => "star",
            BodyType::Planet => "planet",
            BodyType::Moon => "moon",
            BodyType::Ship => "ship",
            BodyType::Asteroid => "asteroid",
        };
        f.write_str(name)
    }
}
