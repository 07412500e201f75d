pub mod error;
pub mod simulation;
pub mod time_value;
pub mod types;

pub use error::SimulatorError;
pub use simulation::{run_simulation, run_simulation_json, simulate};
pub use types::*;

/// Standard result type for all simulator operations
pub type SimulatorResult<T> = Result<T, SimulatorError>;
