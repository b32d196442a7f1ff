use orbsim::{load_schema_from_path, load_universe, IntegratorConfig};
use orbsim::{bench_integrators, bench_passive_curve};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use std::path::PathBuf;

/// Headless runner: load a universe, advance it, report
#[derive(Parser, Debug)]
struct Args {
    /// Scenario file; bare names are looked up under scenarios/
    #[arg(short, long, default_value = "minimal.yaml")]
    file: String,

    /// Ticks to advance
    #[arg(short = 'n', long, default_value_t = 600)]
    steps: u64,

    /// Override the scenario's integrator (verlet or rk45)
    #[arg(long)]
    integrator: Option<IntegratorConfig>,

    /// Print the final state as YAML
    #[arg(long)]
    dump: bool,

    /// Run the stepping benchmarks instead of a scenario
    #[arg(long)]
    bench: bool,
}

fn scenario_path(file: &str) -> PathBuf {
    let direct = PathBuf::from(file);
    if direct.exists() {
        return direct;
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(file)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if args.bench {
        bench_integrators()?;
        bench_passive_curve()?;
        return Ok(());
    }

    let path = scenario_path(&args.file);
    let mut schema = load_schema_from_path(&path)
        .with_context(|| format!("failed to load scenario {}", path.display()))?;
    if let Some(integrator) = args.integrator {
        schema.settings.integrator = Some(integrator);
    }

    let mut universe = load_universe(&schema).context("failed to build universe")?;
    if !universe.unresolved.is_empty() {
        warn!(unresolved = ?universe.unresolved, "some bodies were left out");
    }
    info!(
        universe = %universe.name,
        bodies = universe.simulation.body_count(),
        integrator = ?universe.simulation.integrator().kind(),
        "loaded"
    );

    let sim = &mut universe.simulation;
    let before = sim.conservation();
    let state = sim.step_multiple(args.steps).context("simulation diverged")?;
    let after = sim.conservation();

    let drift = if before.total != 0.0 {
        ((after.total - before.total) / before.total).abs()
    } else {
        0.0
    };
    let stats = sim.get_stats();
    info!(
        tick = stats.tick,
        time = stats.simulation_time,
        massive = stats.massive_bodies,
        passive = stats.passive_bodies,
        energy_drift = drift,
        "done"
    );

    if args.dump {
        println!("{}", serde_yaml::to_string(&state)?);
    }

    Ok(())
}
