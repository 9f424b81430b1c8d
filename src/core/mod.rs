pub mod errors;
mod gates;
mod measurements;
mod state;
pub mod utils;

pub use gates::Gate;
pub use measurements::{Measurement, MeasurementResult};
pub use state::QuantumState;
