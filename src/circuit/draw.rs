//! Text rendering of a circuit, one column per instruction.

use super::{Condition, Operation, QuantumCircuit};
use std::fmt;

const QUBIT_WIRE: &str = "─────";
const CLBIT_WIRE: &str = "═════";

fn boxed(label: &str) -> String {
    format!("┤{label:^3}├")
}

struct Column {
    cells: Vec<String>,
}

impl Column {
    fn empty(num_qubits: usize, num_clbits: usize) -> Self {
        let cells = std::iter::repeat_n(QUBIT_WIRE.to_string(), num_qubits)
            .chain(std::iter::repeat_n(CLBIT_WIRE.to_string(), num_clbits))
            .collect();
        Self { cells }
    }

    /// Draws a vertical connector through untouched rows in `lo..hi`.
    /// Classical links cross qubit wires as `╫`, quantum links as `┼`.
    fn connect(&mut self, lo: usize, hi: usize, classical: bool) {
        for row in lo + 1..hi {
            let cell = &mut self.cells[row];
            if cell.as_str() == QUBIT_WIRE {
                *cell = if classical { "──╫──" } else { "──┼──" }.to_string();
            } else if cell.as_str() == CLBIT_WIRE {
                *cell = "══╬══".to_string();
            }
        }
    }
}

impl QuantumCircuit {
    fn row_labels(&self) -> Vec<String> {
        let qubit_labels = self
            .qregs()
            .iter()
            .flat_map(|reg| (0..reg.len()).map(move |i| format!("{}_{}: ", reg.name(), i)));
        let clbit_labels = self
            .cregs()
            .iter()
            .flat_map(|reg| (0..reg.len()).map(move |i| format!("{}_{}: ", reg.name(), i)));
        let labels: Vec<String> = qubit_labels.chain(clbit_labels).collect();
        let width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        labels
            .into_iter()
            .map(|l| format!("{l:>width$}"))
            .collect()
    }

    fn column_for(&self, index: usize) -> Column {
        let nq = self.num_qubits();
        let mut col = Column::empty(nq, self.num_clbits());
        let inst = &self.instructions()[index];
        let mut rows: Vec<usize> = Vec::new();

        match &inst.operation {
            Operation::Gate {
                gate,
                target,
                controls,
            } => {
                col.cells[target.0] = boxed(gate.label());
                rows.push(target.0);
                for c in controls {
                    col.cells[c.0] = "──■──".to_string();
                    rows.push(c.0);
                }
            }
            Operation::Measure { qubit, clbit } => {
                col.cells[qubit.0] = boxed("M");
                col.cells[nq + clbit.0] = "══╩══".to_string();
                rows.push(qubit.0);
                rows.push(nq + clbit.0);
            }
            Operation::Barrier { qubits } => {
                for q in qubits {
                    col.cells[q.0] = "──░──".to_string();
                }
            }
        }

        if let Some(cond) = &inst.condition {
            let bits: Vec<(usize, bool)> = match cond {
                Condition::Bit { clbit, value } => vec![(clbit.0, *value)],
                Condition::Register { clbits, value } => clbits
                    .iter()
                    .enumerate()
                    .map(|(i, c)| (c.0, (value >> i) & 1 == 1))
                    .collect(),
            };
            for (clbit, value) in bits {
                col.cells[nq + clbit] = format!("═{:^3}═", u8::from(value));
                rows.push(nq + clbit);
            }
        }

        if let (Some(&lo), Some(&hi)) = (rows.iter().min(), rows.iter().max()) {
            let classical =
                inst.condition.is_some() || matches!(inst.operation, Operation::Measure { .. });
            col.connect(lo, hi, classical);
        }
        col
    }
}

impl fmt::Display for QuantumCircuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns: Vec<Column> = (0..self.instructions().len())
            .map(|i| self.column_for(i))
            .collect();
        let nq = self.num_qubits();

        for (row, label) in self.row_labels().iter().enumerate() {
            let wire = if row < nq { "─" } else { "═" };
            let body: String = columns.iter().map(|c| c.cells[row].as_str()).collect();
            writeln!(f, "{label}{wire}{body}{wire}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_gates_controls_and_measurements() {
        let mut circ = QuantumCircuit::new();
        let q = circ.add_quantum_register("q", 2).unwrap();
        let c = circ.add_classical_register("c", 2).unwrap();
        circ.h(q[0]).unwrap();
        circ.cx(q[0], q[1]).unwrap();
        circ.measure(q[0], c[0]).unwrap();

        let text = circ.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("q_0: "));
        assert!(lines[0].contains("┤ H ├"));
        assert!(lines[0].contains("──■──"));
        assert!(lines[1].contains("┤ X ├"));
        assert!(lines[2].starts_with("c_0: "));
        assert!(lines[2].contains("══╩══"));
        // measurement of q_0 passes over q_1 on its way down
        assert!(lines[1].contains("──╫──"));
    }

    #[test]
    fn all_rows_have_equal_width() {
        let mut circ = QuantumCircuit::new();
        let q = circ.add_quantum_register("q", 3).unwrap();
        let c = circ.add_classical_register("c", 3).unwrap();
        circ.s(q[0]).unwrap();
        circ.sdg(q[1]).unwrap();
        circ.barrier_all().unwrap();
        circ.z(q[2]).unwrap().c_if(c[0], true).unwrap();

        let text = circ.to_string();
        let widths: Vec<usize> = text.lines().map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
        assert!(text.contains("┤Sdg├"));
        assert!(text.contains("──░──"));
        assert!(text.contains("═ 1 ═"));
    }

    #[test]
    fn register_condition_boxes_each_bit() {
        let mut circ = QuantumCircuit::new();
        let q = circ.add_quantum_register("q", 2).unwrap();
        let c = circ.add_classical_register("c", 2).unwrap();
        circ.x(q[0]).unwrap().c_if_register(&c, 0b10).unwrap();

        let text = circ.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].contains("┤ X ├"));
        assert!(lines[1].contains("──╫──"));
        assert!(lines[2].starts_with("c_0: "));
        assert!(lines[2].contains("═ 0 ═"));
        assert!(lines[3].contains("═ 1 ═"));
    }
}
