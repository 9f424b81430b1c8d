use crate::circuit::{Condition, Operation, QuantumCircuit};
use crate::core::errors::SimulationError;
use crate::core::{Gate, Measurement, QuantumState};
use crate::counts::Counts;
use ndarray::Array2;
use num_complex::Complex64;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, info_span};

/// Largest register the backend accepts. A density matrix over `n` qubits
/// holds `4^n` complex entries.
pub const MAX_QUBITS: usize = 12;

/// Instruction lowered to what the density-matrix backend executes.
enum Step {
    Unitary(Array2<Complex64>),
    Measure { qubit: usize, clbit: usize },
}

struct CompiledStep {
    step: Step,
    condition: Option<Condition>,
}

/// Shot-based simulator running a [`QuantumCircuit`] on a density matrix.
///
/// Every shot starts from |0...0> with all classical bits cleared, executes the
/// instructions in order and records the final classical bits as an outcome key.
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    /// Seed for the measurement RNG. `None` draws a fresh seed per run.
    pub seed: Option<u64>,
}

impl Simulator {
    pub fn new() -> Self {
        Self { seed: None }
    }

    /// Makes runs reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn compile(circuit: &QuantumCircuit) -> Result<Vec<CompiledStep>, SimulationError> {
        let n = circuit.num_qubits();
        let mut steps = Vec::with_capacity(circuit.instructions().len());

        for inst in circuit.instructions() {
            let step = match &inst.operation {
                Operation::Gate {
                    gate,
                    target,
                    controls,
                } => {
                    let controls: Vec<usize> = controls.iter().map(|c| c.index()).collect();
                    let full = Gate::expand_gate(n, &gate.gate(), &[target.index()], &controls)?;
                    Step::Unitary(full.matrix)
                }
                Operation::Measure { qubit, clbit } => Step::Measure {
                    qubit: qubit.index(),
                    clbit: clbit.index(),
                },
                Operation::Barrier { .. } => continue,
            };
            debug!(instruction = %inst, "compiled");
            steps.push(CompiledStep {
                step,
                condition: inst.condition.clone(),
            });
        }
        Ok(steps)
    }

    fn run_shot(
        steps: &[CompiledStep],
        num_qubits: usize,
        num_clbits: usize,
        z_basis: &Measurement,
        rng: &mut StdRng,
    ) -> Result<Vec<bool>, SimulationError> {
        let mut state = QuantumState::new(num_qubits);
        let mut bits = vec![false; num_clbits];

        for compiled in steps {
            if let Some(cond) = &compiled.condition {
                if !cond.is_satisfied(&bits) {
                    continue;
                }
            }
            match &compiled.step {
                Step::Unitary(u) => state.apply_expanded(u)?,
                Step::Measure { qubit, clbit } => {
                    let res = state.measure(z_basis, &[*qubit], rng)?;
                    bits[*clbit] = res.index == 1;
                }
            }
        }
        Ok(bits)
    }

    /// Runs `circuit` for `shots` repetitions and returns the outcome counts.
    pub fn run(&self, circuit: &QuantumCircuit, shots: usize) -> Result<Counts, SimulationError> {
        if shots == 0 {
            return Err(SimulationError::NoShots);
        }
        if circuit.num_qubits() == 0 {
            return Err(SimulationError::EmptyCircuit);
        }
        if circuit.num_qubits() > MAX_QUBITS {
            return Err(SimulationError::TooManyQubits {
                num_qubits: circuit.num_qubits(),
                max: MAX_QUBITS,
            });
        }
        circuit.validate()?;

        let span = info_span!(
            "simulate",
            qubits = circuit.num_qubits(),
            clbits = circuit.num_clbits(),
            shots
        );
        let _guard = span.enter();

        let steps = Self::compile(circuit)?;
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let z_basis = Measurement::z_basis();

        let mut counts = Counts::new();
        for _ in 0..shots {
            let bits = Self::run_shot(
                &steps,
                circuit.num_qubits(),
                circuit.num_clbits(),
                &z_basis,
                &mut rng,
            )?;
            counts.record(circuit.outcome_key(&bits));
        }

        info!(outcomes = counts.len(), "simulation finished");
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::CircuitError;

    #[test]
    fn deterministic_circuit_has_single_outcome() {
        let mut circ = QuantumCircuit::new();
        let q = circ.add_quantum_register("q", 2).unwrap();
        let c = circ.add_classical_register("c", 2).unwrap();
        circ.x(q[1]).unwrap();
        circ.measure(q[0], c[0]).unwrap();
        circ.measure(q[1], c[1]).unwrap();

        let counts = Simulator::new().run(&circ, 64).unwrap();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts.get("10"), 64);
    }

    #[test]
    fn bell_pair_only_yields_correlated_outcomes() {
        let mut circ = QuantumCircuit::new();
        let q = circ.add_quantum_register("q", 2).unwrap();
        let c = circ.add_classical_register("c", 2).unwrap();
        circ.h(q[0]).unwrap();
        circ.cx(q[0], q[1]).unwrap();
        circ.measure(q[0], c[0]).unwrap();
        circ.measure(q[1], c[1]).unwrap();

        let counts = Simulator::new().with_seed(11).run(&circ, 2000).unwrap();
        assert_eq!(counts.get("01") + counts.get("10"), 0);
        let zeros = counts.get("00") as f64 / 2000.0;
        assert!((zeros - 0.5).abs() < 0.05, "P(00) = {zeros}");
    }

    #[test]
    fn conditioned_gate_follows_classical_bit() {
        // q0 is |1>, so the conditioned X on q1 always fires.
        let mut circ = QuantumCircuit::new();
        let q = circ.add_quantum_register("q", 2).unwrap();
        let c = circ.add_classical_register("c", 2).unwrap();
        circ.x(q[0]).unwrap();
        circ.measure(q[0], c[0]).unwrap();
        circ.x(q[1]).unwrap().c_if(c[0], true).unwrap();
        circ.measure(q[1], c[1]).unwrap();

        let counts = Simulator::new().run(&circ, 32).unwrap();
        assert_eq!(counts.get("11"), 32);
    }

    #[test]
    fn register_condition_compares_whole_value() {
        let mut circ = QuantumCircuit::new();
        let q = circ.add_quantum_register("q", 3).unwrap();
        let c = circ.add_classical_register("c", 2).unwrap();
        let out = circ.add_classical_register("out", 1).unwrap();
        circ.x(q[0]).unwrap();
        circ.measure(q[0], c[0]).unwrap();
        circ.measure(q[1], c[1]).unwrap();
        // c == 0b01 holds, c == 0b11 does not
        circ.x(q[2]).unwrap().c_if_register(&c, 0b01).unwrap();
        circ.z(q[2]).unwrap().c_if_register(&c, 0b11).unwrap();
        circ.measure(q[2], out[0]).unwrap();

        let counts = Simulator::new().run(&circ, 16).unwrap();
        assert_eq!(counts.get("1 01"), 16);
    }

    #[test]
    fn false_condition_fires_on_cleared_bit() {
        // q0 stays |0>, so c0 reads 0: the X on q1 fires and the X on q0 does not.
        let mut circ = QuantumCircuit::new();
        let q = circ.add_quantum_register("q", 2).unwrap();
        let c = circ.add_classical_register("c", 2).unwrap();
        circ.measure(q[0], c[0]).unwrap();
        circ.x(q[1]).unwrap().c_if(c[0], false).unwrap();
        circ.x(q[0]).unwrap().c_if(c[0], true).unwrap();
        circ.measure(q[1], c[1]).unwrap();

        let counts = Simulator::new().run(&circ, 32).unwrap();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts.get("10"), 32);
    }

    #[test]
    fn same_seed_same_counts() {
        let mut circ = QuantumCircuit::new();
        let q = circ.add_quantum_register("q", 2).unwrap();
        let c = circ.add_classical_register("c", 2).unwrap();
        circ.h(q[0]).unwrap();
        circ.h(q[1]).unwrap();
        circ.measure(q[0], c[0]).unwrap();
        circ.measure(q[1], c[1]).unwrap();

        let a = Simulator::new().with_seed(42).run(&circ, 500).unwrap();
        let b = Simulator::new().with_seed(42).run(&circ, 500).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_zero_shots_and_empty_circuits() {
        let circ = QuantumCircuit::new();
        assert!(matches!(
            Simulator::new().run(&circ, 0),
            Err(SimulationError::NoShots)
        ));
        assert!(matches!(
            Simulator::new().run(&circ, 1),
            Err(SimulationError::EmptyCircuit)
        ));
    }

    #[test]
    fn rejects_registers_too_wide_for_a_density_matrix() {
        let mut circ = QuantumCircuit::new();
        let q = circ.add_quantum_register("q", 64).unwrap();
        let c = circ.add_classical_register("c", 1).unwrap();
        circ.measure(q[63], c[0]).unwrap();

        assert!(matches!(
            Simulator::new().run(&circ, 1),
            Err(SimulationError::TooManyQubits { num_qubits: 64, max: MAX_QUBITS })
        ));

        let mut circ = QuantumCircuit::new();
        circ.add_quantum_register("q", MAX_QUBITS + 1).unwrap();
        let err = Simulator::new().run(&circ, 1).unwrap_err();
        assert!(err.to_string().contains("at most 12"), "{err}");
    }

    #[test]
    fn invalid_condition_surfaces_as_circuit_error() {
        let mut other = QuantumCircuit::new();
        other.add_quantum_register("q", 1).unwrap();
        let wide = other.add_classical_register("c", 3).unwrap();

        let mut circ = QuantumCircuit::new();
        let q = circ.add_quantum_register("q", 1).unwrap();
        circ.add_classical_register("c", 1).unwrap();
        circ.x(q[0]).unwrap().c_if(wide[2], true).unwrap();

        assert!(matches!(
            Simulator::new().run(&circ, 1),
            Err(SimulationError::Circuit(CircuitError::ClbitOutOfRange { .. }))
        ));
    }
}
