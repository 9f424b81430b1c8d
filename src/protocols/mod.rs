//! Quantum communication protocols expressed as circuits.

pub mod teleport;
pub use teleport::{Preparation, TeleportCircuit, TeleportReport, build_circuit};
