use crate::core::errors::GateError;
use crate::core::utils;
use ndarray::{Array2, arr2};
use num_complex::Complex64;
use std::f64::consts::FRAC_1_SQRT_2;

/// Represents a quantum gate.
///
/// A gate is defined by its unitary matrix and the number of qubits it acts on.
#[derive(Clone, Debug)]
pub struct Gate {
    /// The unitary matrix of the gate.
    pub matrix: Array2<Complex64>,
    /// The number of qubits the gate acts on.
    pub num_qubits: usize,
}

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

impl Gate {
    /// Creates a new `Gate` from a unitary matrix.
    ///
    /// # Errors
    ///
    /// Returns a `GateError` if:
    /// - The matrix is not square.
    /// - The matrix dimensions are not a power of 2.
    /// - The matrix is not unitary.
    pub fn new(matrix: Array2<Complex64>) -> Result<Self, GateError> {
        let (rows, cols) = matrix.dim();

        if rows != cols {
            return Err(GateError::NotSquareMatrix);
        }

        if !rows.is_power_of_two() {
            return Err(GateError::InvalidDimensions);
        }

        if !Self::check_unitary(&matrix) {
            return Err(GateError::NonUnitary);
        }

        let num_qubits = rows.trailing_zeros() as usize;

        Ok(Self { matrix, num_qubits })
    }

    /// Single-qubit gate from a matrix known to be unitary.
    fn single(matrix: [[Complex64; 2]; 2]) -> Gate {
        Gate {
            matrix: arr2(&matrix),
            num_qubits: 1,
        }
    }

    /// Checks if a given matrix is unitary
    fn check_unitary(matrix: &Array2<Complex64>) -> bool {
        let (rows, _) = matrix.dim();
        let eye = Array2::<Complex64>::eye(rows);

        let product = matrix.dot(&utils::dagger(matrix));

        product
            .iter()
            .zip(eye.iter())
            .all(|(a, b)| (*a - *b).norm() < 1e-6)
    }

    /// Returns the adjoint gate U†.
    pub fn adjoint(&self) -> Gate {
        Gate {
            matrix: utils::dagger(&self.matrix),
            num_qubits: self.num_qubits,
        }
    }

    /// Expands a gate to act on a larger system of qubits.
    ///
    /// This function creates a new gate that acts on `num_total_qubits` by applying
    /// the original `gate` to the specified `targets` and `controls` (if any), and
    /// Identity on the rest.
    ///
    /// # Errors
    ///
    /// Returns `GateError` if:
    /// - `targets` does not match the gate width.
    /// - Duplicate indices are found in `targets` or `controls`.
    /// - A qubit is used as both control and target.
    pub fn expand_gate(
        num_total_qubits: usize,
        gate: &Gate,
        targets: &[usize],
        controls: &[usize],
    ) -> Result<Gate, GateError> {
        if targets.len() != gate.num_qubits {
            return Err(GateError::InvalidDimensions);
        }

        if let Some(dup) = utils::find_duplicate(targets) {
            return Err(GateError::DuplicateQubit(dup));
        }

        if let Some(dup) = utils::find_duplicate(controls) {
            return Err(GateError::DuplicateQubit(dup));
        }

        for &c in controls {
            if targets.contains(&c) {
                return Err(GateError::ControlTargetOverlap(c));
            }
        }

        Ok(Gate {
            matrix: utils::expand_operator(num_total_qubits, &gate.matrix, targets, controls),
            num_qubits: num_total_qubits,
        })
    }

    // --- Standard Gates ---

    /// Creates an Identity gate.
    pub fn i() -> Gate {
        Gate::single([[ONE, ZERO], [ZERO, ONE]])
    }

    /// Creates a Pauli-X gate (NOT gate).
    pub fn x() -> Gate {
        Gate::single([[ZERO, ONE], [ONE, ZERO]])
    }

    /// Creates a Pauli-Y gate.
    pub fn y() -> Gate {
        Gate::single([
            [ZERO, Complex64::new(0.0, -1.0)],
            [Complex64::new(0.0, 1.0), ZERO],
        ])
    }

    /// Creates a Pauli-Z gate.
    pub fn z() -> Gate {
        Gate::single([[ONE, ZERO], [ZERO, Complex64::new(-1.0, 0.0)]])
    }

    /// Creates a Hadamard gate.
    pub fn h() -> Gate {
        let f = Complex64::new(FRAC_1_SQRT_2, 0.0);
        Gate::single([[f, f], [f, -f]])
    }

    /// Creates an S gate (Phase gate, Z^1/2).
    pub fn s() -> Gate {
        Gate::single([[ONE, ZERO], [ZERO, Complex64::new(0.0, 1.0)]])
    }

    /// Creates an S† gate.
    pub fn sdg() -> Gate {
        Gate::s().adjoint()
    }

    /// Creates a T gate (Z^1/4).
    pub fn t_gate() -> Gate {
        Gate::single([
            [ONE, ZERO],
            [ZERO, Complex64::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2)],
        ])
    }

    /// Creates a T† gate.
    pub fn tdg() -> Gate {
        Gate::t_gate().adjoint()
    }
}
