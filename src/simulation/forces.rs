//! Gravitational acceleration and conservation diagnostics
//!
//! Defines softened Newtonian gravity evaluated body-by-body against a set of
//! massive sources, plus energy and momentum sums used to check integrator
//! quality.

use serde::Serialize;

use crate::error::{PhysicsError, PhysicsResult};

use super::constants::{G, SOFTENING_LENGTH};
use super::states::CelestialBody;
use super::vector::Vector3D;

/// Newtonian gravity with a Plummer-style softening length
///
/// For a target at `x`, each source `j` contributes
/// `G * m_j * r / (d^2 + s^2)^(3/2)` with `r = x_j - x` and `d = |r|`.
/// Softening is unconditional, so coincident bodies give a finite (zero)
/// result instead of a division by zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonianGravity {
    pub softening: f64, // meters
}

impl Default for NewtonianGravity {
    fn default() -> Self {
        Self {
            softening: SOFTENING_LENGTH,
        }
    }
}

impl NewtonianGravity {
    pub fn new(softening: f64) -> Self {
        Self { softening }
    }

    /// Acceleration at `position` for the body `id` from every source except
    /// itself. A non-finite sum is reported against `id`.
    pub fn acceleration_at<'a, I>(
        &self,
        id: &str,
        position: &Vector3D,
        sources: I,
    ) -> PhysicsResult<Vector3D>
    where
        I: IntoIterator<Item = &'a CelestialBody>,
    {
        let soft2 = self.softening * self.softening;
        let mut out = Vector3D::zero();

        for other in sources {
            if other.id == id {
                continue;
            }

            // r points from the target toward the source
            let r = other.position - *position;
            let d2 = r.length_squared();
            let soft_d2 = d2 + soft2;

            // |a| = G m / (d^2 + s^2), direction r / sqrt(d^2 + s^2)
            let accel_mag = G * other.mass / soft_d2;
            out += r * (accel_mag / soft_d2.sqrt());
        }

        if !out.is_finite() {
            return Err(PhysicsError::DivergentAcceleration(id.to_string()));
        }
        Ok(out)
    }

    pub fn acceleration<'a, I>(&self, body: &CelestialBody, sources: I) -> PhysicsResult<Vector3D>
    where
        I: IntoIterator<Item = &'a CelestialBody>,
    {
        self.acceleration_at(&body.id, &body.position, sources)
    }
}

/// Energy and momentum totals for a set of bodies
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConservationQuantities {
    pub kinetic: f64, // J
    pub potential: f64, // J, pairwise, unsoftened
    pub total: f64, // J
    pub momentum: Vector3D, // kg m/s
    pub angular_momentum: Vector3D, // kg m^2/s, about the origin
}

/// Sum kinetic energy, pairwise potential, linear and angular momentum
///
/// Passive-passive pairs are skipped since they never interact.
pub fn conservation_quantities(bodies: &[CelestialBody]) -> ConservationQuantities {
    let mut kinetic = 0.0;
    let mut potential = 0.0;
    let mut momentum = Vector3D::zero();
    let mut angular_momentum = Vector3D::zero();

    for (i, bi) in bodies.iter().enumerate() {
        kinetic += bi.kinetic_energy();
        momentum += bi.velocity * bi.mass;

        // L = r x (m v)
        let mut l = bi.position;
        l.cross(&(bi.velocity * bi.mass));
        angular_momentum += l;

        for bj in &bodies[i + 1..] {
            if !bi.is_massive() && !bj.is_massive() {
                continue;
            }
            let r = bi.position.distance_to(&bj.position);
            if r > 0.0 {
                potential -= G * bi.mass * bj.mass / r;
            }
        }
    }

    ConservationQuantities {
        kinetic,
        potential,
        total: kinetic + potential,
        momentum,
        angular_momentum,
    }
}
