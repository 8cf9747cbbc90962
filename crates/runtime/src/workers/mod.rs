//! Background tasks owned by the runtime.
mod simulation;

pub use simulation::{Command, SimulationWorker};
