//! Time integrators for the N-body system
//!
//! Two interchangeable strategies behind the [`Integrator`] enum:
//! - [`VelocityVerlet`]  symplectic, fixed step, reuses a(t) across steps
//! - [`AdaptiveRk45`]    Cash-Karp embedded 4(5) pair, per-body substepping
//!
//! Both advance `targets` (indices into `bodies`) by `dt` under gravity from
//! `sources`, mutate in place and validate the final position and velocity.
//! `targets` and `sources` may be the same set (massive vs massive).

use std::collections::HashMap;

use crate::configuration::config::IntegratorConfig;
use crate::error::PhysicsResult;

use super::forces::NewtonianGravity;
use super::params::Parameters;
use super::states::CelestialBody;
use super::vector::Vector3D;

/// Strategy chosen once at construction, dispatched by variant
#[derive(Debug, Clone)]
pub enum Integrator {
    VelocityVerlet(VelocityVerlet),
    AdaptiveRk45(AdaptiveRk45),
}

impl Integrator {
    /// Build the integrator named in `params`
    pub fn from_params(params: &Parameters) -> Self {
        match params.integrator {
            IntegratorConfig::Verlet => Integrator::VelocityVerlet(VelocityVerlet::new()),
            IntegratorConfig::Rk45 => Integrator::AdaptiveRk45(AdaptiveRk45::new(
                params.tolerance,
                params.min_dt,
                params.max_dt,
            )),
        }
    }

    pub fn kind(&self) -> IntegratorConfig {
        match self {
            Integrator::VelocityVerlet(_) => IntegratorConfig::Verlet,
            Integrator::AdaptiveRk45(_) => IntegratorConfig::Rk45,
        }
    }

    pub fn step(
        &mut self,
        gravity: &NewtonianGravity,
        bodies: &mut [CelestialBody],
        targets: &[usize],
        sources: &[usize],
        dt: f64,
    ) -> PhysicsResult<()> {
        match self {
            Integrator::VelocityVerlet(v) => v.step(gravity, bodies, targets, sources, dt),
            Integrator::AdaptiveRk45(rk) => rk.step(gravity, bodies, targets, sources, dt),
        }
    }

    /// Drop all per-body cached state; required after any population change
    pub fn reset(&mut self) {
        match self {
            Integrator::VelocityVerlet(v) => v.reset(),
            Integrator::AdaptiveRk45(rk) => rk.reset(),
        }
    }
}

fn source_iter<'a>(
    bodies: &'a [CelestialBody],
    sources: &'a [usize],
) -> impl Iterator<Item = &'a CelestialBody> + 'a {
    sources.iter().map(move |&j| &bodies[j])
}

fn validate_kinematics(body: &CelestialBody) -> PhysicsResult<()> {
    body.position.validate(&format!("{}.position", body.id))?;
    body.velocity.validate(&format!("{}.velocity", body.id))
}

// =========================================================================================
// Velocity Verlet
// =========================================================================================

/// Kick-drift-kick velocity Verlet with a(t) carried over from the previous
/// step, so each step costs one force evaluation per body instead of two.
#[derive(Debug, Clone, Default)]
pub struct VelocityVerlet {
    acceleration_cache: HashMap<String, Vector3D>, // a(t) by body id
}

impl VelocityVerlet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bodies with a cached acceleration
    pub fn cached_bodies(&self) -> usize {
        self.acceleration_cache.len()
    }

    pub fn step(
        &mut self,
        gravity: &NewtonianGravity,
        bodies: &mut [CelestialBody],
        targets: &[usize],
        sources: &[usize],
        dt: f64,
    ) -> PhysicsResult<()> {
        if targets.is_empty() {
            return Ok(());
        }
        let half_dt = 0.5 * dt;
        let dt2 = dt * dt;

        // a(t): cached from the last step, or evaluated fresh
        let mut a_old = Vec::with_capacity(targets.len());
        for &i in targets {
            let body = &bodies[i];
            let a = match self.acceleration_cache.get(&body.id) {
                Some(a) => *a,
                None => gravity.acceleration(body, source_iter(bodies, sources))?,
            };
            a_old.push(a);
        }

        // x(t+dt) = x + v dt + a dt^2 / 2
        // v(t+dt/2) = v + a dt / 2
        for (&i, a) in targets.iter().zip(&a_old) {
            let b = &mut bodies[i];
            b.position += b.velocity * dt + *a * (0.5 * dt2);
            b.velocity += *a * half_dt;
        }

        // a(t+dt) at the drifted positions
        let mut a_new = Vec::with_capacity(targets.len());
        for &i in targets {
            a_new.push(gravity.acceleration(&bodies[i], source_iter(bodies, sources))?);
        }

        // v(t+dt) = v(t+dt/2) + a(t+dt) dt / 2
        for (&i, a) in targets.iter().zip(a_new) {
            let b = &mut bodies[i];
            b.velocity += a * half_dt;
            validate_kinematics(b)?;
            self.acceleration_cache.insert(b.id.clone(), a);
        }

        Ok(())
    }

    pub fn reset(&mut self) {
        self.acceleration_cache.clear();
    }
}

// =========================================================================================
// Adaptive RK45 (Cash-Karp)
// =========================================================================================

// Stage nodes c_i are not needed: gravity has no explicit time dependence

const CK_B: [[f64; 5]; 6] = [
    [0.0, 0.0, 0.0, 0.0, 0.0],
    [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0],
    [3.0 / 10.0, -9.0 / 10.0, 6.0 / 5.0, 0.0, 0.0],
    [-11.0 / 54.0, 5.0 / 2.0, -70.0 / 27.0, 35.0 / 27.0, 0.0],
    [
        1631.0 / 55296.0,
        175.0 / 512.0,
        575.0 / 13824.0,
        44275.0 / 110592.0,
        253.0 / 4096.0,
    ],
];

// Fifth-order weights
const CK_C5: [f64; 6] = [
    37.0 / 378.0,
    0.0,
    250.0 / 621.0,
    125.0 / 594.0,
    0.0,
    512.0 / 1771.0,
];

// Embedded fourth-order weights
const CK_C4: [f64; 6] = [
    2825.0 / 27648.0,
    0.0,
    18575.0 / 48384.0,
    13525.0 / 55296.0,
    277.0 / 14336.0,
    1.0 / 4.0,
];

const SAFETY: f64 = 0.9;

/// Outcome of one trial substep
struct Trial {
    position: Vector3D,
    velocity: Vector3D,
    error: f64, // meters
}

/// Error-controlled Cash-Karp integrator
///
/// Each body is advanced on its own: the target `dt` is split into substeps
/// whose length adapts to the local error estimate. Other bodies are held
/// fixed while one body substeps. The last accepted substep length is kept
/// per body as the next trial step.
#[derive(Debug, Clone)]
pub struct AdaptiveRk45 {
    pub tolerance: f64, // accepted position error per substep, m
    pub min_dt: f64, // substep floor, always accepted
    pub max_dt: f64, // substep ceiling
    trial_steps: HashMap<String, f64>,
}

impl Default for AdaptiveRk45 {
    fn default() -> Self {
        Self::new(1e-9, 1e-4, 3600.0)
    }
}

impl AdaptiveRk45 {
    pub fn new(tolerance: f64, min_dt: f64, max_dt: f64) -> Self {
        Self {
            tolerance,
            min_dt,
            max_dt,
            trial_steps: HashMap::new(),
        }
    }

    /// Substep length this body will try next, if it has stepped before
    pub fn trial_step(&self, id: &str) -> Option<f64> {
        self.trial_steps.get(id).copied()
    }

    pub fn step(
        &mut self,
        gravity: &NewtonianGravity,
        bodies: &mut [CelestialBody],
        targets: &[usize],
        sources: &[usize],
        dt: f64,
    ) -> PhysicsResult<()> {
        for &i in targets {
            self.step_body(gravity, bodies, i, sources, dt)?;
        }
        Ok(())
    }

    /// Advance a single body by exactly `dt`, returning the number of
    /// accepted substeps
    pub fn step_body(
        &mut self,
        gravity: &NewtonianGravity,
        bodies: &mut [CelestialBody],
        target: usize,
        sources: &[usize],
        dt: f64,
    ) -> PhysicsResult<usize> {
        let id = bodies[target].id.clone();
        let mut position = bodies[target].position;
        let mut velocity = bodies[target].velocity;

        let mut h = self
            .trial_steps
            .get(&id)
            .copied()
            .unwrap_or(dt)
            .min(self.max_dt);
        let mut remaining = dt;
        let mut accepted = 0;

        while remaining > dt * 1e-12 {
            h = h.min(remaining);
            let trial = self.cash_karp(gravity, &id, position, velocity, h, bodies, sources)?;

            if trial.error < self.tolerance || h <= self.min_dt {
                position = trial.position;
                velocity = trial.velocity;
                remaining -= h;
                accepted += 1;

                let grow = if trial.error > 0.0 {
                    SAFETY * (self.tolerance / trial.error).powf(0.2)
                } else {
                    2.0
                };
                h = (h * grow).max(self.min_dt).min(self.max_dt);
            } else {
                let shrink = SAFETY * (self.tolerance / trial.error).powf(0.25);
                h = (h * shrink).max(self.min_dt);
            }
        }

        self.trial_steps.insert(id, h);

        let body = &mut bodies[target];
        body.position = position;
        body.velocity = velocity;
        validate_kinematics(body)?;
        Ok(accepted)
    }

    /// One six-stage evaluation of `x' = v, v' = a(x)`; stage positions are
    /// built from the stage velocities, not only the initial one.
    #[allow(clippy::too_many_arguments)]
    fn cash_karp(
        &self,
        gravity: &NewtonianGravity,
        id: &str,
        x0: Vector3D,
        v0: Vector3D,
        h: f64,
        bodies: &[CelestialBody],
        sources: &[usize],
    ) -> PhysicsResult<Trial> {
        let mut kx = [Vector3D::zero(); 6]; // stage velocities
        let mut kv = [Vector3D::zero(); 6]; // stage accelerations

        for i in 0..6 {
            let mut xi = x0;
            let mut vi = v0;
            for j in 0..i {
                xi += kx[j] * (h * CK_B[i][j]);
                vi += kv[j] * (h * CK_B[i][j]);
            }
            kx[i] = vi;
            kv[i] = gravity.acceleration_at(id, &xi, source_iter(bodies, sources))?;
        }

        let mut dx5 = Vector3D::zero();
        let mut dv5 = Vector3D::zero();
        let mut dx_err = Vector3D::zero();
        let mut dv_err = Vector3D::zero();
        for i in 0..6 {
            dx5 += kx[i] * CK_C5[i];
            dv5 += kv[i] * CK_C5[i];
            let dc = CK_C5[i] - CK_C4[i];
            dx_err += kx[i] * dc;
            dv_err += kv[i] * dc;
        }

        // Difference of the two solutions taken on the increments, which
        // avoids cancellation against large absolute coordinates
        let pos_err = max_abs(&(dx_err * h));
        let vel_err = max_abs(&(dv_err * h)) * h;

        Ok(Trial {
            position: x0 + dx5 * h,
            velocity: v0 + dv5 * h,
            error: pos_err.max(vel_err),
        })
    }

    pub fn reset(&mut self) {
        self.trial_steps.clear();
    }
}

fn max_abs(v: &Vector3D) -> f64 {
    v.x().abs().max(v.y().abs()).max(v.z().abs())
}
