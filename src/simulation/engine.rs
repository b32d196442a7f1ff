//! N-body simulation engine
//!
//! Owns the body registry, the massive/passive classification cache, the
//! active integrator and the simulation clock. Every structural change
//! (add, remove, load, reset) marks the cache dirty and resets the
//! integrator; the next step or cache-dependent query rebuilds it.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, trace};

use crate::configuration::config::IntegratorConfig;
use crate::error::{PhysicsError, PhysicsResult};

use super::constants::{G, PHYSICS_HZ};
use super::forces::{conservation_quantities, ConservationQuantities, NewtonianGravity};
use super::integrator::Integrator;
use super::params::Parameters;
use super::states::{CelestialBody, SimulationState};
use super::validation::{assert_valid_state, validate_body};
use super::vector::Vector3D;

/// Where the engine is in its cache lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Empty, // no bodies
    Clean, // classification cache matches the registry
    Dirty, // population changed since the last rebuild
}

/// Observability snapshot, not authoritative
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationStats {
    pub total_bodies: usize,
    pub massive_bodies: usize,
    pub passive_bodies: usize,
    pub simulation_time: f64, // s
    pub tick: u64,
    pub dt: f64, // s
    pub physics_hz: f64,
    pub integrator: IntegratorConfig,
    pub last_step: Option<Duration>, // wall clock of the most recent step
}

#[derive(Debug, Clone)]
pub struct NBodySimulation {
    bodies: Vec<CelestialBody>, // insertion order, ids unique
    massive: Vec<usize>, // indices of stars, planets, moons
    passive: Vec<usize>, // indices of ships, asteroids
    dirty: bool,
    time: f64,
    tick: u64,
    params: Parameters,
    gravity: NewtonianGravity,
    integrator: Integrator,
    last_step: Option<Duration>,
}

impl Default for NBodySimulation {
    fn default() -> Self {
        let params = Parameters::default();
        Self::build(params)
    }
}

impl NBodySimulation {
    /// Empty simulation with validated parameters
    pub fn new(params: Parameters) -> PhysicsResult<Self> {
        params.validate()?;
        Ok(Self::build(params))
    }

    pub(crate) fn build(params: Parameters) -> Self {
        Self {
            bodies: Vec::new(),
            massive: Vec::new(),
            passive: Vec::new(),
            dirty: true,
            time: 0.0,
            tick: 0,
            gravity: NewtonianGravity::new(params.softening),
            integrator: Integrator::from_params(&params),
            params,
            last_step: None,
        }
    }

    pub fn params(&self) -> &Parameters {
        &self.params
    }

    pub fn dt(&self) -> f64 {
        self.params.dt
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn integrator(&self) -> &Integrator {
        &self.integrator
    }

    pub fn gravity(&self) -> &NewtonianGravity {
        &self.gravity
    }

    pub fn cache_state(&self) -> CacheState {
        if self.bodies.is_empty() {
            CacheState::Empty
        } else if self.dirty {
            CacheState::Dirty
        } else {
            CacheState::Clean
        }
    }

    fn invalidate(&mut self) {
        self.dirty = true;
        self.integrator.reset();
    }

    fn rebuild_cache(&mut self) {
        self.massive.clear();
        self.passive.clear();
        for (i, body) in self.bodies.iter().enumerate() {
            if body.is_massive() {
                self.massive.push(i);
            } else {
                self.passive.push(i);
            }
        }
        self.dirty = false;
        debug!(
            massive = self.massive.len(),
            passive = self.passive.len(),
            "rebuilt body classification cache"
        );
    }

    fn ensure_cache(&mut self) {
        if self.dirty {
            self.rebuild_cache();
        }
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.bodies.iter().position(|b| b.id == id)
    }

    // =========================================================================================
    // Registry
    // =========================================================================================

    /// Validate and insert a body. Nothing is inserted on failure.
    pub fn add_body(&mut self, body: CelestialBody) -> PhysicsResult<&CelestialBody> {
        validate_body(&body).into_result()?;
        if self.index_of(&body.id).is_some() {
            return Err(PhysicsError::DuplicateBody(body.id));
        }
        debug!(id = %body.id, kind = %body.kind, mass = body.mass, "adding body");

        self.bodies.push(body);
        self.invalidate();
        let last = self.bodies.len() - 1;
        Ok(&self.bodies[last])
    }

    /// Remove by id; returns whether the body existed
    pub fn remove_body(&mut self, id: &str) -> bool {
        match self.index_of(id) {
            Some(i) => {
                self.bodies.remove(i);
                self.invalidate();
                debug!(id, "removed body");
                true
            }
            None => false,
        }
    }

    pub fn get_body(&self, id: &str) -> Option<&CelestialBody> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn get_all_bodies(&self) -> &[CelestialBody] {
        &self.bodies
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    // =========================================================================================
    // Stepping
    // =========================================================================================

    /// Advance one tick and return the resulting snapshot
    pub fn step(&mut self) -> PhysicsResult<SimulationState> {
        self.advance()?;
        Ok(self.get_state())
    }

    /// Advance `count` ticks back to back, returning the final snapshot
    pub fn step_multiple(&mut self, count: u64) -> PhysicsResult<SimulationState> {
        for _ in 0..count {
            self.advance()?;
        }
        Ok(self.get_state())
    }

    fn advance(&mut self) -> PhysicsResult<()> {
        let started = Instant::now();
        self.ensure_cache();
        let dt = self.params.dt;

        // Massive bodies pull on each other: O(m^2)
        if !self.massive.is_empty() {
            self.integrator.step(
                &self.gravity,
                &mut self.bodies,
                &self.massive,
                &self.massive,
                dt,
            )?;
        }

        // Passive bodies feel the massive set only: O(p * m)
        if !self.passive.is_empty() {
            self.integrator.step(
                &self.gravity,
                &mut self.bodies,
                &self.passive,
                &self.massive,
                dt,
            )?;
        }

        self.time += dt;
        self.tick += 1;
        self.last_step = Some(started.elapsed());
        trace!(tick = self.tick, time = self.time, "stepped");
        Ok(())
    }

    // =========================================================================================
    // Snapshots
    // =========================================================================================

    pub fn get_state(&self) -> SimulationState {
        SimulationState {
            time: self.time,
            tick: self.tick,
            bodies: self.bodies.clone(),
        }
    }

    /// Replace the whole population and clock with `state`
    ///
    /// The snapshot is checked in full before anything is touched, so a bad
    /// snapshot leaves the current simulation as it was.
    pub fn load_state(&mut self, state: &SimulationState) -> PhysicsResult<()> {
        assert_valid_state(state, "NBodySimulation::load_state")?;

        let mut staged = NBodySimulation::build(self.params.clone());
        for body in &state.bodies {
            staged.add_body(body.clone())?;
        }

        self.bodies = staged.bodies;
        self.time = state.time;
        self.tick = state.tick;
        self.last_step = None;
        self.invalidate();

        assert_valid_state(&self.get_state(), "NBodySimulation::load_state")?;
        debug!(bodies = self.bodies.len(), tick = self.tick, "loaded state");
        Ok(())
    }

    /// Drop every body and rewind the clock; parameters are kept
    pub fn reset(&mut self) {
        self.bodies.clear();
        self.massive.clear();
        self.passive.clear();
        self.time = 0.0;
        self.tick = 0;
        self.last_step = None;
        self.invalidate();
    }

    // =========================================================================================
    // Live tuning
    // =========================================================================================

    /// Change the softening length; cached accelerations are discarded
    pub fn set_gravitational_softening(&mut self, softening: f64) -> PhysicsResult<()> {
        if !(softening.is_finite() && softening > 0.0) {
            return Err(PhysicsError::parameter(
                "softening",
                format!("must be positive and finite, got {softening}"),
            ));
        }
        self.params.softening = softening;
        self.gravity.softening = softening;
        self.integrator.reset();
        Ok(())
    }

    pub fn set_timestep(&mut self, dt: f64) -> PhysicsResult<()> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(PhysicsError::parameter(
                "dt",
                format!("must be positive and finite, got {dt}"),
            ));
        }
        self.params.dt = dt;
        Ok(())
    }

    // =========================================================================================
    // Derived quantities
    // =========================================================================================

    /// Circular orbit speed `sqrt(G M / r)`, m/s
    pub fn calculate_orbital_velocity(parent_mass: f64, distance: f64) -> f64 {
        (G * parent_mass / distance).sqrt()
    }

    /// Sphere-of-influence radius `a (m / M)^(2/5)`, m
    pub fn calculate_soi(body_mass: f64, parent_mass: f64, semi_major_axis: f64) -> f64 {
        semi_major_axis * (body_mass / parent_mass).powf(0.4)
    }

    /// Massive body with the strongest pull `G m / d^2` at `position`
    ///
    /// A position exactly on a body gives it infinite influence, so that body wins.
    pub fn find_soi(&mut self, position: &Vector3D) -> Option<&CelestialBody> {
        self.ensure_cache();

        let mut dominant = None;
        let mut max_influence = 0.0;
        for &i in &self.massive {
            let body = &self.bodies[i];
            let d2 = position.distance_squared_to(&body.position);
            let influence = G * body.mass / d2;
            if influence > max_influence {
                max_influence = influence;
                dominant = Some(i);
            }
        }
        dominant.map(|i| &self.bodies[i])
    }

    pub fn conservation(&self) -> ConservationQuantities {
        conservation_quantities(&self.bodies)
    }

    pub fn get_stats(&mut self) -> SimulationStats {
        self.ensure_cache();
        SimulationStats {
            total_bodies: self.bodies.len(),
            massive_bodies: self.massive.len(),
            passive_bodies: self.passive.len(),
            simulation_time: self.time,
            tick: self.tick,
            dt: self.params.dt,
            physics_hz: PHYSICS_HZ,
            integrator: self.integrator.kind(),
            last_step: self.last_step,
        }
    }
}
