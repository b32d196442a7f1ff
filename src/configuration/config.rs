//! Configuration types for loading universes from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! universe. A universe consists of:
//!
//! - [`SettingsSchema`]   – optional engine settings (timestep, integrator, ...)
//! - [`BodySchema`]       – one entry per body, with explicit state or an orbit
//! - [`OrbitSchema`]      – orbital elements relative to a named parent
//! - [`UniverseSchema`]   – top-level wrapper
//!
//! # YAML format
//! An Earth–Moon universe matching these types:
//!
//! ```yaml
//! name: minimal
//! description: Earth and Moon
//! settings:
//!   dt: 0.016666666666666666   # seconds per tick
//!   integrator: verlet         # or "rk45"
//!
//! bodies:
//!   - id: earth
//!     name: Earth
//!     type: planet
//!     mass: 5.9722e24
//!     radius: 6.371e6
//!     position: { x: 0.0, y: 0.0, z: 0.0 }
//!     velocity: { x: 0.0, y: 0.0, z: 0.0 }
//!   - id: moon
//!     name: Moon
//!     type: moon
//!     mass: 7.342e22
//!     radius: 1.7374e6
//!     orbit:
//!       parent: earth
//!       semiMajorAxis: 3.844e8
//!       eccentricity: 0.0549
//! ```
//!
//! The loader in `simulation::scenario` maps this into a live
//! `NBodySimulation`.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PhysicsResult;
use crate::simulation::constants::BodyType;
use crate::simulation::states::Visual;
use crate::simulation::vector::Vector3D;

/// Which integrator the engine builds: `integrator: verlet` or `integrator: rk45`
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntegratorConfig {
    #[default]
    #[serde(rename = "verlet", alias = "velocity-verlet")] // Symplectic, bounded energy drift, fixed step
    Verlet,

    #[serde(rename = "rk45")] // Cash-Karp adaptive, tighter error control, more force evaluations
    Rk45,
}

impl std::str::FromStr for IntegratorConfig {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "verlet" | "velocity-verlet" => Ok(IntegratorConfig::Verlet),
            "rk45" => Ok(IntegratorConfig::Rk45),
            other => Err(format!("unknown integrator '{other}' (expected verlet or rk45)")),
        }
    }
}

/// Engine settings; anything left out falls back to `Parameters::default()`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SettingsSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dt: Option<f64>, // seconds per tick
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrator: Option<IntegratorConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub softening: Option<f64>, // m
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>, // rk45 only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_dt: Option<f64>, // rk45 only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_dt: Option<f64>, // rk45 only
}

/// Orbital elements relative to `parent`; angles in radians
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrbitSchema {
    pub parent: String, // id of the body being orbited
    pub semi_major_axis: f64, // m
    #[serde(default)]
    pub eccentricity: f64,
    #[serde(default)]
    pub inclination: f64, // rotation about the X axis
    #[serde(default)]
    pub true_anomaly: f64, // starting angle from periapsis
}

/// Configuration for a single body
///
/// Either `orbit` is given (state derived from the parent) or the explicit
/// `position`/`velocity` pair is used, defaulting to zero.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BodySchema {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: BodyType,
    pub mass: f64, // kg
    pub radius: f64, // m
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Vector3D>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity: Option<Vector3D>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orbit: Option<OrbitSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual: Option<Visual>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>, // descriptive parent for explicit-state bodies
}

/// Top-level universe configuration loaded from YAML
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UniverseSchema {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub settings: SettingsSchema,
    pub bodies: Vec<BodySchema>,
}

pub fn load_schema_from_str(yaml: &str) -> PhysicsResult<UniverseSchema> {
    Ok(serde_yaml::from_str(yaml)?)
}

pub fn load_schema_from_path(path: impl AsRef<Path>) -> PhysicsResult<UniverseSchema> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);
    Ok(serde_yaml::from_reader(reader)?)
}

impl UniverseSchema {
    pub fn to_yaml(&self) -> PhysicsResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
