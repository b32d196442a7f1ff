pub mod error;
pub mod simulation;
pub mod configuration;
pub mod benchmark;

pub use error::{PhysicsError, PhysicsResult};

pub use simulation::vector::{Vector3D, VectorData, NVec3};
pub use simulation::constants::{BodyType, is_massive, G, SOFTENING_LENGTH, PHYSICS_HZ, DT, AU};
pub use simulation::states::{CelestialBody, SimulationState, Visual};
pub use simulation::validation::{ValidationResult, validate_body, validate_vector, assert_valid_state};
pub use simulation::forces::{NewtonianGravity, ConservationQuantities, conservation_quantities};
pub use simulation::integrator::{Integrator, VelocityVerlet, AdaptiveRk45};
pub use simulation::params::Parameters;
pub use simulation::engine::{NBodySimulation, CacheState, SimulationStats};
pub use simulation::scenario::{Universe, load_universe, populate, export_universe, calculate_orbital_state};

pub use configuration::config::{IntegratorConfig, UniverseSchema, BodySchema, OrbitSchema, SettingsSchema, load_schema_from_path, load_schema_from_str};

pub use benchmark::benchmark::{bench_integrators, bench_passive_curve};
