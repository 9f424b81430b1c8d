//! Circuit construction.
//!
//! A [`QuantumCircuit`] owns its registers and an ordered list of
//! [`Instruction`]s. Qubits and classical bits are addressed through the
//! handles its registers hand out, so `q[0]` is always a circuit-wide index.

mod draw;
mod instruction;
mod register;

pub use instruction::{Condition, Instruction, Operation, StandardGate};
pub use register::{ClassicalRegister, Clbit, QuantumRegister, Qubit};

use crate::core::errors::CircuitError;
use crate::core::utils::find_duplicate;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuantumCircuit {
    qregs: Vec<QuantumRegister>,
    cregs: Vec<ClassicalRegister>,
    num_qubits: usize,
    num_clbits: usize,
    instructions: Vec<Instruction>,
}

impl QuantumCircuit {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_register_name(&self, name: &str, size: usize) -> Result<(), CircuitError> {
        if size == 0 {
            return Err(CircuitError::EmptyRegister(name.to_string()));
        }
        let taken = self.qregs.iter().any(|r| r.name() == name)
            || self.cregs.iter().any(|r| r.name() == name);
        if taken {
            return Err(CircuitError::DuplicateRegister(name.to_string()));
        }
        Ok(())
    }

    /// Appends `size` fresh qubits under `name`.
    pub fn add_quantum_register(
        &mut self,
        name: &str,
        size: usize,
    ) -> Result<QuantumRegister, CircuitError> {
        self.check_register_name(name, size)?;
        let reg = QuantumRegister::new(name, self.num_qubits, size);
        self.num_qubits += size;
        self.qregs.push(reg.clone());
        Ok(reg)
    }

    /// Appends `size` fresh classical bits under `name`.
    pub fn add_classical_register(
        &mut self,
        name: &str,
        size: usize,
    ) -> Result<ClassicalRegister, CircuitError> {
        self.check_register_name(name, size)?;
        let reg = ClassicalRegister::new(name, self.num_clbits, size);
        self.num_clbits += size;
        self.cregs.push(reg.clone());
        Ok(reg)
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn num_clbits(&self) -> usize {
        self.num_clbits
    }

    pub fn qregs(&self) -> &[QuantumRegister] {
        &self.qregs
    }

    pub fn cregs(&self) -> &[ClassicalRegister] {
        &self.cregs
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    fn check_qubit(&self, qubit: Qubit) -> Result<(), CircuitError> {
        if qubit.0 >= self.num_qubits {
            return Err(CircuitError::QubitOutOfRange {
                index: qubit.0,
                num_qubits: self.num_qubits,
            });
        }
        Ok(())
    }

    fn check_clbit(&self, clbit: Clbit) -> Result<(), CircuitError> {
        if clbit.0 >= self.num_clbits {
            return Err(CircuitError::ClbitOutOfRange {
                index: clbit.0,
                num_clbits: self.num_clbits,
            });
        }
        Ok(())
    }

    fn check_operation(&self, operation: &Operation) -> Result<(), CircuitError> {
        let qubits = operation.qubits();
        for &q in &qubits {
            self.check_qubit(q)?;
        }
        let indices: Vec<usize> = qubits.iter().map(|q| q.0).collect();
        if let Some(dup) = find_duplicate(&indices) {
            return Err(CircuitError::DuplicateQubit(dup));
        }
        if let Operation::Measure { clbit, .. } = operation {
            self.check_clbit(*clbit)?;
        }
        Ok(())
    }

    /// Validates and appends an operation, returning it so a condition can be attached.
    pub fn append(&mut self, operation: Operation) -> Result<&mut Instruction, CircuitError> {
        self.check_operation(&operation)?;
        let idx = self.instructions.len();
        self.instructions.push(Instruction::new(operation));
        Ok(&mut self.instructions[idx])
    }

    fn single(
        &mut self,
        gate: StandardGate,
        target: Qubit,
    ) -> Result<&mut Instruction, CircuitError> {
        self.append(Operation::Gate {
            gate,
            target,
            controls: Vec::new(),
        })
    }

    pub fn i(&mut self, q: Qubit) -> Result<&mut Instruction, CircuitError> {
        self.single(StandardGate::I, q)
    }

    pub fn x(&mut self, q: Qubit) -> Result<&mut Instruction, CircuitError> {
        self.single(StandardGate::X, q)
    }

    pub fn y(&mut self, q: Qubit) -> Result<&mut Instruction, CircuitError> {
        self.single(StandardGate::Y, q)
    }

    pub fn z(&mut self, q: Qubit) -> Result<&mut Instruction, CircuitError> {
        self.single(StandardGate::Z, q)
    }

    pub fn h(&mut self, q: Qubit) -> Result<&mut Instruction, CircuitError> {
        self.single(StandardGate::H, q)
    }

    pub fn s(&mut self, q: Qubit) -> Result<&mut Instruction, CircuitError> {
        self.single(StandardGate::S, q)
    }

    pub fn sdg(&mut self, q: Qubit) -> Result<&mut Instruction, CircuitError> {
        self.single(StandardGate::Sdg, q)
    }

    pub fn t(&mut self, q: Qubit) -> Result<&mut Instruction, CircuitError> {
        self.single(StandardGate::T, q)
    }

    pub fn tdg(&mut self, q: Qubit) -> Result<&mut Instruction, CircuitError> {
        self.single(StandardGate::Tdg, q)
    }

    /// Applies any gate of the standard set to `q`.
    pub fn gate(
        &mut self,
        gate: StandardGate,
        q: Qubit,
    ) -> Result<&mut Instruction, CircuitError> {
        self.single(gate, q)
    }

    /// Controlled-X.
    pub fn cx(
        &mut self,
        control: Qubit,
        target: Qubit,
    ) -> Result<&mut Instruction, CircuitError> {
        self.append(Operation::Gate {
            gate: StandardGate::X,
            target,
            controls: vec![control],
        })
    }

    /// Controlled-Z.
    pub fn cz(
        &mut self,
        control: Qubit,
        target: Qubit,
    ) -> Result<&mut Instruction, CircuitError> {
        self.append(Operation::Gate {
            gate: StandardGate::Z,
            target,
            controls: vec![control],
        })
    }

    pub fn measure(
        &mut self,
        qubit: Qubit,
        clbit: Clbit,
    ) -> Result<&mut Instruction, CircuitError> {
        self.append(Operation::Measure { qubit, clbit })
    }

    pub fn barrier(&mut self, qubits: &[Qubit]) -> Result<&mut Instruction, CircuitError> {
        self.append(Operation::Barrier {
            qubits: qubits.to_vec(),
        })
    }

    /// Barrier across every qubit in the circuit.
    pub fn barrier_all(&mut self) -> Result<&mut Instruction, CircuitError> {
        let qubits: Vec<Qubit> = (0..self.num_qubits).map(Qubit).collect();
        self.barrier(&qubits)
    }

    /// Re-checks every instruction, including the classical bits named by conditions.
    pub fn validate(&self) -> Result<(), CircuitError> {
        for inst in &self.instructions {
            self.check_operation(&inst.operation)?;
            if let Some(cond) = &inst.condition {
                if matches!(inst.operation, Operation::Barrier { .. }) {
                    return Err(CircuitError::ConditionOnBarrier);
                }
                for clbit in cond.clbits() {
                    self.check_clbit(clbit)?;
                }
            }
        }
        Ok(())
    }

    /// Number of operations, barriers excluded.
    pub fn size(&self) -> usize {
        self.instructions
            .iter()
            .filter(|i| !matches!(i.operation, Operation::Barrier { .. }))
            .count()
    }

    /// Operation name -> occurrences.
    pub fn count_ops(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for inst in &self.instructions {
            *counts.entry(inst.operation.name()).or_insert(0) += 1;
        }
        counts
    }

    /// Length of the critical path over qubit and classical wires. Barriers
    /// take no time step.
    pub fn depth(&self) -> usize {
        let mut qubit_level = vec![0usize; self.num_qubits];
        let mut clbit_level = vec![0usize; self.num_clbits];

        for inst in &self.instructions {
            if matches!(inst.operation, Operation::Barrier { .. }) {
                continue;
            }
            let qubits: Vec<usize> = inst.operation.qubits().iter().map(|q| q.0).collect();
            let mut clbits: Vec<usize> = inst
                .condition
                .as_ref()
                .map(|c| c.clbits().iter().map(|b| b.0).collect())
                .unwrap_or_default();
            if let Operation::Measure { clbit, .. } = inst.operation {
                clbits.push(clbit.0);
            }

            let level = qubits
                .iter()
                .map(|&q| qubit_level[q])
                .chain(clbits.iter().map(|&c| clbit_level[c]))
                .max()
                .unwrap_or(0)
                + 1;
            for q in qubits {
                qubit_level[q] = level;
            }
            for c in clbits {
                clbit_level[c] = level;
            }
        }

        qubit_level
            .into_iter()
            .chain(clbit_level)
            .max()
            .unwrap_or(0)
    }

    /// Formats classical bits as an outcome key: registers in reverse order
    /// separated by a space, each register written most significant bit first.
    pub fn outcome_key(&self, bits: &[bool]) -> String {
        self.cregs
            .iter()
            .rev()
            .map(|reg| {
                reg.clbits()
                    .iter()
                    .rev()
                    .map(|c| if bits[c.0] { '1' } else { '0' })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bell() -> (QuantumCircuit, QuantumRegister, ClassicalRegister) {
        let mut circ = QuantumCircuit::new();
        let q = circ.add_quantum_register("q", 2).unwrap();
        let c = circ.add_classical_register("c", 2).unwrap();
        circ.h(q[0]).unwrap();
        circ.cx(q[0], q[1]).unwrap();
        circ.barrier_all().unwrap();
        circ.measure(q[0], c[0]).unwrap();
        circ.measure(q[1], c[1]).unwrap();
        (circ, q, c)
    }

    #[test]
    fn registers_get_consecutive_indices() {
        let mut circ = QuantumCircuit::new();
        let a = circ.add_quantum_register("a", 2).unwrap();
        let b = circ.add_quantum_register("b", 3).unwrap();
        assert_eq!(a[1].index(), 1);
        assert_eq!(b[0].index(), 2);
        assert_eq!(circ.num_qubits(), 5);
    }

    #[test]
    fn register_names_are_unique_and_non_empty() {
        let mut circ = QuantumCircuit::new();
        circ.add_quantum_register("q", 1).unwrap();
        assert_eq!(
            circ.add_classical_register("q", 1).unwrap_err(),
            CircuitError::DuplicateRegister("q".into())
        );
        assert_eq!(
            circ.add_classical_register("c", 0).unwrap_err(),
            CircuitError::EmptyRegister("c".into())
        );
    }

    #[test]
    fn cx_rejects_same_qubit_twice() {
        let mut circ = QuantumCircuit::new();
        let q = circ.add_quantum_register("q", 2).unwrap();
        assert_eq!(
            circ.cx(q[1], q[1]).unwrap_err(),
            CircuitError::DuplicateQubit(1)
        );
    }

    #[test]
    fn foreign_handles_are_rejected() {
        let mut big = QuantumCircuit::new();
        let q = big.add_quantum_register("q", 4).unwrap();
        let mut small = QuantumCircuit::new();
        small.add_quantum_register("q", 2).unwrap();
        assert!(matches!(
            small.h(q[3]),
            Err(CircuitError::QubitOutOfRange { index: 3, .. })
        ));
    }

    #[test]
    fn validate_catches_condition_on_missing_clbit() {
        let mut other = QuantumCircuit::new();
        other.add_quantum_register("q", 1).unwrap();
        let wide = other.add_classical_register("c", 5).unwrap();

        let mut circ = QuantumCircuit::new();
        let q = circ.add_quantum_register("q", 1).unwrap();
        circ.add_classical_register("c", 1).unwrap();
        circ.x(q[0]).unwrap().c_if(wide[4], true).unwrap();
        assert!(matches!(
            circ.validate(),
            Err(CircuitError::ClbitOutOfRange { index: 4, .. })
        ));
    }

    #[test]
    fn size_depth_and_counts() {
        let (circ, _, _) = bell();
        assert_eq!(circ.size(), 4);
        assert_eq!(circ.depth(), 3);
        let ops = circ.count_ops();
        assert_eq!(ops["measure"], 2);
        assert_eq!(ops["cx"], 1);
        assert_eq!(ops["barrier"], 1);
    }

    #[test]
    fn outcome_key_is_msb_first_per_register() {
        let mut circ = QuantumCircuit::new();
        circ.add_quantum_register("q", 1).unwrap();
        circ.add_classical_register("a", 2).unwrap();
        circ.add_classical_register("b", 1).unwrap();
        // a = [1, 0], b = [1]
        assert_eq!(circ.outcome_key(&[true, false, true]), "1 01");
    }
}
