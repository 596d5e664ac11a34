//! Vertical ride simulation for suspension models.
//!
//! Provides:
//! - Deterministic road excitation profiles (sinusoid, step, linear chirp)
//! - Quarter-car, seat-added quarter-car and half-car equations of motion
//! - Dormand-Prince 5(4) adaptive integrator with dense output
//! - Single and batch simulation runners producing sampled trajectories

pub mod error;
pub mod integrator;
pub mod model;
pub mod road;
pub mod sim;
pub mod vehicle;

// Re-exports for public API
pub use error::{SimError, SimResult};
pub use integrator::{DenseSolution, Integrator, Rk45, SolverStats};
pub use model::{Dynamics, ParamMap, VehicleKind, VehicleModel};
pub use road::RoadProfile;
pub use sim::{Scenario, SimOptions, Trajectory, run_batch, run_sim};
pub use vehicle::{HalfCar, QuarterCar, SeatAddedQuarterCar, Vehicle};
