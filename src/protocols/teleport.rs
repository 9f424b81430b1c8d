use crate::circuit::{ClassicalRegister, QuantumCircuit, QuantumRegister, StandardGate};
use crate::core::errors::{CircuitError, ConfigError};
use crate::counts::Counts;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Single-qubit state Alice hands over, prepared from |0> on qubit 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preparation {
    Zero,
    One,
    Plus,
    Minus,
    /// (|0> + i|1>)/√2, reached with H then S.
    #[default]
    PlusI,
    MinusI,
}

impl Preparation {
    pub const ALL: [Preparation; 6] = [
        Preparation::Zero,
        Preparation::One,
        Preparation::Plus,
        Preparation::Minus,
        Preparation::PlusI,
        Preparation::MinusI,
    ];

    /// Gates taking |0> to the prepared state, in application order.
    pub fn gates(self) -> Vec<StandardGate> {
        match self {
            Preparation::Zero => vec![],
            Preparation::One => vec![StandardGate::X],
            Preparation::Plus => vec![StandardGate::H],
            Preparation::Minus => vec![StandardGate::X, StandardGate::H],
            Preparation::PlusI => vec![StandardGate::H, StandardGate::S],
            Preparation::MinusI => vec![StandardGate::H, StandardGate::Sdg],
        }
    }

    /// Gates taking the prepared state back to |0>.
    pub fn inverse_gates(self) -> Vec<StandardGate> {
        self.gates().into_iter().rev().map(StandardGate::inverse).collect()
    }

    /// Probability that a Z measurement of the state reads 1.
    pub fn one_probability(self) -> f64 {
        match self {
            Preparation::Zero => 0.0,
            Preparation::One => 1.0,
            _ => 0.5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Preparation::Zero => "zero",
            Preparation::One => "one",
            Preparation::Plus => "plus",
            Preparation::Minus => "minus",
            Preparation::PlusI => "plus-i",
            Preparation::MinusI => "minus-i",
        }
    }
}

impl fmt::Display for Preparation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preparation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zero" | "0" => Ok(Preparation::Zero),
            "one" | "1" => Ok(Preparation::One),
            "plus" | "+" => Ok(Preparation::Plus),
            "minus" | "-" => Ok(Preparation::Minus),
            "plus-i" | "+i" => Ok(Preparation::PlusI),
            "minus-i" | "-i" => Ok(Preparation::MinusI),
            _ => Err(ConfigError::UnknownState(s.to_string())),
        }
    }
}

/// The three-qubit teleportation circuit and its registers.
///
/// q0 holds the state to send, q1 is Alice's half of the Bell pair and q2 is
/// Bob's. c0 and c1 receive Alice's measurements, c2 Bob's final check.
pub struct TeleportCircuit {
    pub circuit: QuantumCircuit,
    pub q: QuantumRegister,
    pub c: ClassicalRegister,
    pub preparation: Preparation,
}

impl TeleportCircuit {
    /// Builds the protocol up to and including Bob's corrections.
    pub fn build(preparation: Preparation) -> Result<Self, CircuitError> {
        let mut circuit = QuantumCircuit::new();
        let q = circuit.add_quantum_register("q", 3)?;
        let c = circuit.add_classical_register("c", 3)?;

        for gate in preparation.gates() {
            circuit.gate(gate, q[0])?;
        }
        circuit.barrier_all()?;

        // Shared Bell pair between Alice (q1) and Bob (q2)
        circuit.h(q[1])?;
        circuit.cx(q[1], q[2])?;
        circuit.barrier_all()?;

        // Alice rotates into the Bell basis and measures
        circuit.cx(q[0], q[1])?;
        circuit.h(q[0])?;
        circuit.measure(q[0], c[0])?;
        circuit.measure(q[1], c[1])?;

        // Bob's corrections
        circuit.x(q[2])?.c_if(c[1], true)?;
        circuit.z(q[2])?.c_if(c[0], true)?;

        Ok(Self {
            circuit,
            q,
            c,
            preparation,
        })
    }

    /// Appends Bob's measurement into c2. With `verify` the inverse preparation
    /// runs first, so a faithful teleport always reads 0.
    pub fn finish(mut self, verify: bool) -> Result<QuantumCircuit, CircuitError> {
        if verify {
            for gate in self.preparation.inverse_gates() {
                self.circuit.gate(gate, self.q[2])?;
            }
        }
        self.circuit.measure(self.q[2], self.c[2])?;
        Ok(self.circuit)
    }
}

/// Builds the complete circuit in one go.
pub fn build_circuit(
    preparation: Preparation,
    verify: bool,
) -> Result<QuantumCircuit, CircuitError> {
    TeleportCircuit::build(preparation)?.finish(verify)
}

/// Statistics over a teleportation run, keyed on `c2 c1 c0` outcomes.
#[derive(Debug, Clone, PartialEq)]
pub struct TeleportReport {
    pub shots: usize,
    /// Fraction of shots where Bob read 1.
    pub bob_one_probability: f64,
    /// Frequency of each Alice outcome `c1c0`.
    pub alice_distribution: BTreeMap<String, f64>,
    /// Largest distance of an Alice outcome from the uniform 1/4.
    pub alice_max_deviation: f64,
}

impl TeleportReport {
    pub fn from_counts(counts: &Counts) -> Self {
        let shots = counts.total();
        let denom = shots.max(1) as f64;

        let bob = counts.marginal(&[2]);
        let bob_one_probability = bob.get("1") as f64 / denom;

        let alice = counts.marginal(&[0, 1]);
        let alice_distribution: BTreeMap<String, f64> = ["00", "01", "10", "11"]
            .into_iter()
            .map(|k| (k.to_string(), alice.get(k) as f64 / denom))
            .collect();
        let alice_max_deviation = alice_distribution
            .values()
            .map(|p| (p - 0.25).abs())
            .fold(0.0, f64::max);

        Self {
            shots,
            bob_one_probability,
            alice_distribution,
            alice_max_deviation,
        }
    }

    /// Probability Bob should read 1 given what was sent.
    pub fn expected_bob_one(preparation: Preparation, verify: bool) -> f64 {
        if verify {
            0.0
        } else {
            preparation.one_probability()
        }
    }

    /// Bob's statistics match the prepared state and Alice's bits look uniform,
    /// both within `tolerance`.
    pub fn is_consistent(&self, preparation: Preparation, verify: bool, tolerance: f64) -> bool {
        let expected = Self::expected_bob_one(preparation, verify);
        (self.bob_one_probability - expected).abs() <= tolerance
            && self.alice_max_deviation <= tolerance
    }
}

impl fmt::Display for TeleportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "shots={} P(bob=1)={:.4} alice=[",
            self.shots, self.bob_one_probability
        )?;
        for (i, (k, p)) in self.alice_distribution.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{k}:{p:.4}")?;
        }
        write!(f, "] max_dev={:.4}", self.alice_max_deviation)
    }
}
