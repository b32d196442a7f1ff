//! Core state types for the N-body simulation.
//!
//! - `CelestialBody`   a live body owned by the engine, mutated every step
//! - `SimulationState` a plain-data snapshot (time, tick, bodies) that can be
//!   serialized and handed across a process or network boundary
//!
//! Snapshots are clones, never references into the engine.

use serde::{Deserialize, Serialize};

use super::constants::BodyType;
use super::vector::Vector3D;

/// Opaque rendering metadata, carried through untouched
pub type Visual = serde_yaml::Value;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CelestialBody {
    pub id: String, // unique within a simulation
    pub name: String, // display name
    #[serde(rename = "type")]
    pub kind: BodyType, // massive or passive classification
    pub mass: f64, // kg
    pub radius: f64, // m
    #[serde(default)]
    pub position: Vector3D, // m
    #[serde(default)]
    pub velocity: Vector3D, // m/s
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual: Option<Visual>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>, // descriptive only, not a physics dependency
}

impl CelestialBody {
    /// Body at rest at the origin; chain `at`/`moving` to place it
    pub fn new(id: impl Into<String>, kind: BodyType, mass: f64, radius: f64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            kind,
            mass,
            radius,
            position: Vector3D::zero(),
            velocity: Vector3D::zero(),
            visual: None,
            parent: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn at(mut self, position: Vector3D) -> Self {
        self.position = position;
        self
    }

    pub fn moving(mut self, velocity: Vector3D) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn is_massive(&self) -> bool {
        self.kind.is_massive()
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.length_squared()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SimulationState {
    pub time: f64, // seconds since start
    pub tick: u64, // completed steps
    pub bodies: Vec<CelestialBody>,
}

impl SimulationState {
    pub fn body(&self, id: &str) -> Option<&CelestialBody> {
        self.bodies.iter().find(|b| b.id == id)
    }
}
