//! # qteleport
//!
//! Three-qubit quantum teleportation on a small shot-based density-matrix
//! simulator.
//!
//! ```rust
//! use qteleport::{Simulator, TeleportReport, protocols::{Preparation, build_circuit}};
//!
//! let circuit = build_circuit(Preparation::PlusI, true).unwrap();
//! let counts = Simulator::new().with_seed(7).run(&circuit, 1024).unwrap();
//!
//! // Undoing the preparation on Bob's qubit always reads 0.
//! let report = TeleportReport::from_counts(&counts);
//! assert_eq!(report.bob_one_probability, 0.0);
//! ```

pub mod circuit;
pub mod config;
mod core;
pub mod counts;
pub mod histogram;
pub mod logging;
pub mod protocols;
mod simulator;

pub use crate::circuit::{
    ClassicalRegister, Clbit, Condition, Instruction, Operation, QuantumCircuit, QuantumRegister,
    Qubit, StandardGate,
};
pub use crate::core::{Gate, Measurement, MeasurementResult, QuantumState, errors, utils};
pub use crate::counts::Counts;
pub use crate::histogram::Histogram;
pub use crate::protocols::TeleportReport;
pub use crate::simulator::{MAX_QUBITS, Simulator};
