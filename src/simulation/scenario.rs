//! Build fully-initialized simulations from universe configuration
//!
//! Takes a `UniverseSchema` (YAML-facing) and produces a runtime bundle
//! (`Universe`) containing:
//! - the populated `NBodySimulation`
//! - the ids of any bodies whose orbit parent never resolved
//!
//! Bodies with explicit state go in first. Orbiting bodies wait until their
//! parent exists, over a bounded number of passes, so moons of planets of
//! stars resolve in any declaration order.

use std::f64::consts::FRAC_PI_2;

use tracing::{debug, warn};

use crate::configuration::config::{BodySchema, OrbitSchema, SettingsSchema, UniverseSchema};
use crate::error::{PhysicsError, PhysicsResult};

use super::constants::G;
use super::engine::NBodySimulation;
use super::params::Parameters;
use super::states::CelestialBody;
use super::vector::Vector3D;

/// Passes over the deferred list before giving up on orphans
pub const MAX_RESOLVE_PASSES: usize = 10;

/// A loaded universe: the simulation plus anything that could not be placed
#[derive(Debug, Clone)]
pub struct Universe {
    pub name: String,
    pub description: String,
    pub simulation: NBodySimulation,
    pub unresolved: Vec<String>, // orbiting bodies whose parent never appeared
}

/// Position and velocity of a body on `orbit` around `parent`
///
/// The ellipse lies in the XY plane, tilted about the X axis by the
/// inclination, then shifted onto the parent's position and velocity.
pub fn calculate_orbital_state(orbit: &OrbitSchema, parent: &CelestialBody) -> (Vector3D, Vector3D) {
    let a = orbit.semi_major_axis;
    let e = orbit.eccentricity;
    let (sin_i, cos_i) = orbit.inclination.sin_cos();
    let theta = orbit.true_anomaly;

    // r = a(1 - e^2) / (1 + e cos(theta))
    let r = a * (1.0 - e * e) / (1.0 + e * theta.cos());

    // In-plane position, then tilt
    let x_orbit = r * theta.cos();
    let y_orbit = r * theta.sin();
    let offset = Vector3D::new(x_orbit, y_orbit * cos_i, y_orbit * sin_i);

    // Vis-viva: v = sqrt(mu (2/r - 1/a))
    let mu = G * parent.mass;
    let v_mag = (mu * (2.0 / r - 1.0 / a)).sqrt();

    // Perpendicular to the radius within the orbital plane
    let v_angle = theta + FRAC_PI_2;
    let vx_orbit = v_mag * v_angle.cos();
    let vy_orbit = v_mag * v_angle.sin();
    let v_offset = Vector3D::new(vx_orbit, vy_orbit * cos_i, vy_orbit * sin_i);

    (parent.position + offset, parent.velocity + v_offset)
}

fn validate_orbit(id: &str, orbit: &OrbitSchema) -> PhysicsResult<()> {
    let a = orbit.semi_major_axis;
    let e = orbit.eccentricity;
    if !(a.is_finite() && a > 0.0) {
        return Err(PhysicsError::Schema(format!(
            "{id}: semiMajorAxis must be positive and finite, got {a}"
        )));
    }
    if !(e.is_finite() && (0.0..1.0).contains(&e)) {
        return Err(PhysicsError::Schema(format!(
            "{id}: eccentricity must lie in [0, 1), got {e}"
        )));
    }
    if !(orbit.inclination.is_finite() && orbit.true_anomaly.is_finite()) {
        return Err(PhysicsError::Schema(format!("{id}: orbit angles must be finite")));
    }
    Ok(())
}

fn body_from_schema(schema: &BodySchema) -> CelestialBody {
    CelestialBody {
        id: schema.id.clone(),
        name: schema.name.clone(),
        kind: schema.kind,
        mass: schema.mass,
        radius: schema.radius,
        position: schema.position.unwrap_or_default(),
        velocity: schema.velocity.unwrap_or_default(),
        visual: schema.visual.clone(),
        parent: schema.parent.clone(),
    }
}

/// Build a new simulation from `schema`, using its settings
pub fn load_universe(schema: &UniverseSchema) -> PhysicsResult<Universe> {
    let params = Parameters::from_settings(&schema.settings);
    let mut simulation = NBodySimulation::new(params)?;
    let unresolved = populate(schema, &mut simulation)?;

    Ok(Universe {
        name: schema.name.clone(),
        description: schema.description.clone(),
        simulation,
        unresolved,
    })
}

/// Replace the contents of `simulation` with `schema`, keeping its own
/// parameters
///
/// The universe is built into a fresh engine first; on any error the caller's
/// simulation is left as it was. Returns the ids of orbiting bodies that could
/// not be placed.
pub fn populate(schema: &UniverseSchema, simulation: &mut NBodySimulation) -> PhysicsResult<Vec<String>> {
    for body in &schema.bodies {
        if let Some(orbit) = &body.orbit {
            validate_orbit(&body.id, orbit)?;
        }
    }

    let mut staged = NBodySimulation::build(simulation.params().clone());
    let unresolved = fill(schema, &mut staged)?;
    *simulation = staged;
    Ok(unresolved)
}

fn fill(schema: &UniverseSchema, simulation: &mut NBodySimulation) -> PhysicsResult<Vec<String>> {
    // First pass: explicit state (typically the central star)
    let mut pending: Vec<&BodySchema> = Vec::new();
    for body in &schema.bodies {
        match &body.orbit {
            Some(_) => pending.push(body),
            None => {
                simulation.add_body(body_from_schema(body))?;
            }
        }
    }

    // Later passes: place orbiting bodies once their parent exists
    let mut passes = 0;
    while !pending.is_empty() && passes < MAX_RESOLVE_PASSES {
        passes += 1;
        let mut still_pending = Vec::new();

        for body in pending {
            // Checked to be Some when deferred
            let Some(orbit) = &body.orbit else { continue };
            let Some(parent) = simulation.get_body(&orbit.parent) else {
                still_pending.push(body);
                continue;
            };

            let (position, velocity) = calculate_orbital_state(orbit, parent);
            let mut placed = body_from_schema(body);
            placed.position = position;
            placed.velocity = velocity;
            placed.parent = Some(orbit.parent.clone());
            simulation.add_body(placed)?;
        }

        pending = still_pending;
    }

    let unresolved: Vec<String> = pending.iter().map(|b| b.id.clone()).collect();
    if !unresolved.is_empty() {
        warn!(?unresolved, "could not resolve orbital parents");
    }
    debug!(
        universe = %schema.name,
        bodies = simulation.body_count(),
        passes,
        "universe loaded"
    );
    Ok(unresolved)
}

/// Flatten a live simulation back into schema form with explicit state
pub fn export_universe(simulation: &NBodySimulation, name: &str, description: &str) -> UniverseSchema {
    let params = simulation.params();
    UniverseSchema {
        name: name.to_string(),
        description: description.to_string(),
        settings: SettingsSchema {
            dt: Some(params.dt),
            integrator: Some(params.integrator),
            softening: Some(params.softening),
            tolerance: Some(params.tolerance),
            min_dt: Some(params.min_dt),
            max_dt: Some(params.max_dt),
        },
        bodies: simulation
            .get_all_bodies()
            .iter()
            .map(|b| BodySchema {
                id: b.id.clone(),
                name: b.name.clone(),
                kind: b.kind,
                mass: b.mass,
                radius: b.radius,
                position: Some(b.position),
                velocity: Some(b.velocity),
                orbit: None,
                visual: b.visual.clone(),
                parent: b.parent.clone(),
            })
            .collect(),
    }
}
