use super::register::{ClassicalRegister, Clbit, Qubit};
use crate::core::Gate;
use crate::core::errors::CircuitError;
use std::fmt;

/// Fixed single-qubit gate set understood by the circuit builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardGate {
    I,
    X,
    Y,
    Z,
    H,
    S,
    Sdg,
    T,
    Tdg,
}

impl StandardGate {
    /// Lower-case mnemonic, as used by `count_ops`.
    pub fn name(self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
        }
    }

    /// Box label used by the text drawer (at most three characters).
    pub fn label(self) -> &'static str {
        match self {
            StandardGate::I => "I",
            StandardGate::X => "X",
            StandardGate::Y => "Y",
            StandardGate::Z => "Z",
            StandardGate::H => "H",
            StandardGate::S => "S",
            StandardGate::Sdg => "Sdg",
            StandardGate::T => "T",
            StandardGate::Tdg => "Tdg",
        }
    }

    pub fn gate(self) -> Gate {
        match self {
            StandardGate::I => Gate::i(),
            StandardGate::X => Gate::x(),
            StandardGate::Y => Gate::y(),
            StandardGate::Z => Gate::z(),
            StandardGate::H => Gate::h(),
            StandardGate::S => Gate::s(),
            StandardGate::Sdg => Gate::sdg(),
            StandardGate::T => Gate::t_gate(),
            StandardGate::Tdg => Gate::tdg(),
        }
    }

    pub fn inverse(self) -> StandardGate {
        match self {
            StandardGate::S => StandardGate::Sdg,
            StandardGate::Sdg => StandardGate::S,
            StandardGate::T => StandardGate::Tdg,
            StandardGate::Tdg => StandardGate::T,
            other => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// `gate` on `target`, applied only when every control qubit is |1>.
    Gate {
        gate: StandardGate,
        target: Qubit,
        controls: Vec<Qubit>,
    },
    /// Z-basis measurement of `qubit`, written to `clbit`.
    Measure { qubit: Qubit, clbit: Clbit },
    /// Visual separator; no effect on simulation.
    Barrier { qubits: Vec<Qubit> },
}

impl Operation {
    pub fn name(&self) -> String {
        match self {
            Operation::Gate { gate, controls, .. } => {
                format!("{}{}", "c".repeat(controls.len()), gate.name())
            }
            Operation::Measure { .. } => "measure".to_string(),
            Operation::Barrier { .. } => "barrier".to_string(),
        }
    }

    /// Qubits touched, controls first.
    pub fn qubits(&self) -> Vec<Qubit> {
        match self {
            Operation::Gate {
                target, controls, ..
            } => controls.iter().copied().chain([*target]).collect(),
            Operation::Measure { qubit, .. } => vec![*qubit],
            Operation::Barrier { qubits } => qubits.clone(),
        }
    }
}

/// Classical predicate guarding an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Single bit equals `value`.
    Bit { clbit: Clbit, value: bool },
    /// Register read little-endian (first bit is bit 0) equals `value`.
    Register { clbits: Vec<Clbit>, value: u64 },
}

impl Condition {
    pub fn clbits(&self) -> Vec<Clbit> {
        match self {
            Condition::Bit { clbit, .. } => vec![*clbit],
            Condition::Register { clbits, .. } => clbits.clone(),
        }
    }

    /// Evaluates the condition against the current classical bits.
    pub fn is_satisfied(&self, bits: &[bool]) -> bool {
        match self {
            Condition::Bit { clbit, value } => bits[clbit.0] == *value,
            Condition::Register { clbits, value } => {
                let current = clbits
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| bits[c.0])
                    .fold(0u64, |acc, (i, _)| acc | (1 << i));
                current == *value
            }
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Bit { clbit, value } => write!(f, "c{}=={}", clbit.0, u8::from(*value)),
            Condition::Register { clbits, value } => {
                let first = clbits.first().map(|c| c.0).unwrap_or(0);
                write!(f, "c[{}..{}]=={}", first, first + clbits.len(), value)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub operation: Operation,
    pub condition: Option<Condition>,
}

impl Instruction {
    pub(crate) fn new(operation: Operation) -> Self {
        Self {
            operation,
            condition: None,
        }
    }

    fn check_conditionable(&self) -> Result<(), CircuitError> {
        if matches!(self.operation, Operation::Barrier { .. }) {
            return Err(CircuitError::ConditionOnBarrier);
        }
        Ok(())
    }

    /// Runs this instruction only when `clbit` holds `value`.
    pub fn c_if(&mut self, clbit: Clbit, value: bool) -> Result<&mut Self, CircuitError> {
        self.check_conditionable()?;
        self.condition = Some(Condition::Bit { clbit, value });
        Ok(self)
    }

    /// Runs this instruction only when `register` holds `value`.
    pub fn c_if_register(
        &mut self,
        register: &ClassicalRegister,
        value: u64,
    ) -> Result<&mut Self, CircuitError> {
        self.check_conditionable()?;
        let width = register.len();
        if width > 64 || (width < 64 && value >> width != 0) {
            return Err(CircuitError::ConditionOverflow { value, width });
        }
        self.condition = Some(Condition::Register {
            clbits: register.clbits().to_vec(),
            value,
        });
        Ok(self)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.operation.name())?;
        let qubits: Vec<String> = self
            .operation
            .qubits()
            .iter()
            .map(|q| format!("q{}", q.0))
            .collect();
        write!(f, " {}", qubits.join(", "))?;
        if let Operation::Measure { clbit, .. } = &self.operation {
            write!(f, " -> c{}", clbit.0)?;
        }
        if let Some(cond) = &self.condition {
            write!(f, " if {cond}")?;
        }
        Ok(())
    }
}
