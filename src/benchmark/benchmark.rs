use std::time::Instant;

use crate::configuration::config::IntegratorConfig;
use crate::error::PhysicsResult;
use crate::simulation::constants::{BodyType, AU, EARTH_MASS, EARTH_RADIUS, SOLAR_MASS, SOLAR_RADIUS};
use crate::simulation::engine::NBodySimulation;
use crate::simulation::params::Parameters;
use crate::simulation::states::CelestialBody;
use crate::simulation::vector::Vector3D;

/// Star at the origin plus `massive` planets and `passive` asteroids on
/// circular orbits at deterministic radii and phases
pub fn make_system(massive: usize, passive: usize, params: Parameters) -> PhysicsResult<NBodySimulation> {
    let mut sim = NBodySimulation::new(params)?;
    sim.add_body(CelestialBody::new("sun", BodyType::Star, SOLAR_MASS, SOLAR_RADIUS))?;

    let total = massive + passive;
    for i in 0..total {
        let i_f = i as f64;
        // deterministic positions, no rand needed
        let r = AU * (0.4 + 0.05 * i_f);
        let phase = i_f * 0.37;
        let v = NBodySimulation::calculate_orbital_velocity(SOLAR_MASS, r);

        let (kind, mass, id) = if i < massive {
            (BodyType::Planet, EARTH_MASS, format!("planet-{i}"))
        } else {
            (BodyType::Asteroid, 1.0e15, format!("asteroid-{i}"))
        };

        sim.add_body(
            CelestialBody::new(id, kind, mass, EARTH_RADIUS)
                .at(Vector3D::new(r * phase.cos(), r * phase.sin(), 0.0))
                .moving(Vector3D::new(-v * phase.sin(), v * phase.cos(), 0.0)),
        )?;
    }
    Ok(sim)
}

/// Wall-clock per step for Verlet and RK45 over growing massive counts
pub fn bench_integrators() -> PhysicsResult<()> {
    let ns = [4, 8, 16, 32, 64];
    let steps = 100;

    for n in ns {
        let mut timings = Vec::new();
        for kind in [IntegratorConfig::Verlet, IntegratorConfig::Rk45] {
            let mut sim = make_system(n, 0, Parameters::default().with_integrator(kind))?;

            // Warm up
            sim.step_multiple(1)?;

            let t0 = Instant::now();
            sim.step_multiple(steps)?;
            timings.push(t0.elapsed().as_secs_f64() / steps as f64);
        }

        println!(
            "N = {:3}, verlet step = {:10.3e} s, rk45 step = {:10.3e} s",
            n + 1,
            timings[0],
            timings[1]
        );
    }
    Ok(())
}

/// Verlet step cost as passive bodies are added to a fixed massive set
/// Paste output directly into a spreadsheet to graph
pub fn bench_passive_curve() -> PhysicsResult<()> {
    println!("massive,passive,verlet_us");

    for massive in [4, 16] {
        for passive in (0..=400).step_by(50) {
            let mut sim = make_system(massive, passive, Parameters::default())?;
            sim.step_multiple(1)?;

            let steps = 20;
            let t0 = Instant::now();
            sim.step_multiple(steps)?;
            let us = t0.elapsed().as_secs_f64() * 1.0e6 / steps as f64;

            println!("{},{},{:.3}", massive + 1, passive, us);
        }
    }
    Ok(())
}
