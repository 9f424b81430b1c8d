//! Utility functions for quantum operations.
//!
//! This module contains helper functions for:
//! - Matrix operations (trace, outer product).
//! - Operator expansion to larger systems.
//! - Completeness checks for measurements.
//! - Bit manipulation for state indices.

use ndarray::{Array1, Array2};
use num_complex::Complex64;

/// Computes the trace of a matrix (sum of diagonal elements).
pub fn trace(matrix: &Array2<Complex64>) -> Complex64 {
    matrix.diag().sum()
}

/// Conjugate transpose of a matrix.
pub fn dagger(matrix: &Array2<Complex64>) -> Array2<Complex64> {
    matrix.t().mapv(|c| c.conj())
}

/// Generates the full operator matrix ($2^N \times 2^N$) for the whole system.
///
/// It expands a local operator acting on `targets` (and controlled by `controls`)
/// to an operator on the full system of `num_total_qubits`. Qubit `k` is bit `k`
/// of the basis-state index.
///
/// # Arguments
///
/// * `num_total_qubits` - Total number of qubits in the system.
/// * `matrix` - The matrix representation of the local gate.
/// * `targets` - Indices of the target qubits.
/// * `controls` - Indices of the control qubits.
pub fn expand_operator(
    num_total_qubits: usize,
    matrix: &Array2<Complex64>,
    targets: &[usize],
    controls: &[usize],
) -> Array2<Complex64> {
    let dim = 1 << num_total_qubits;
    let mut full_matrix = Array2::<Complex64>::zeros((dim, dim));

    let control_mask = controls.iter().fold(0usize, |mask, &c| mask | (1 << c));
    let target_mask = targets.iter().fold(0usize, |mask, &t| mask | (1 << t));
    let passive_mask = !target_mask;

    for col_idx in 0..dim {
        // Controls not all set: the basis state passes through untouched
        if (col_idx & control_mask) != control_mask {
            full_matrix[[col_idx, col_idx]] = Complex64::new(1.0, 0.0);
            continue;
        }

        let small_col = extract_bits(col_idx, targets);
        for small_row in 0..matrix.nrows() {
            let val = matrix[[small_row, small_col]];
            if val.norm_sqr() < f64::EPSILON {
                continue;
            }
            // Keep passive bits, scatter the local row bits onto the targets
            let row_idx = (col_idx & passive_mask) | deposit_bits(small_row, targets);
            full_matrix[[row_idx, col_idx]] = val;
        }
    }
    full_matrix
}

/// Extracts the bits in positions `indices` of the sequence `value`
pub fn extract_bits(value: usize, indices: &[usize]) -> usize {
    let mut result = 0;
    for (i, &pos) in indices.iter().enumerate() {
        if (value >> pos) & 1 == 1 {
            result |= 1 << i;
        }
    }
    result
}

/// Scatters bits from `compact_value` into the positions specified by `indices`.
pub fn deposit_bits(compact_value: usize, indices: &[usize]) -> usize {
    let mut result = 0;
    for (i, &pos) in indices.iter().enumerate() {
        if (compact_value >> i) & 1 == 1 {
            result |= 1 << pos;
        }
    }
    result
}

/// Find duplicate in a slice of usize
pub fn find_duplicate(indices: &[usize]) -> Option<usize> {
    let mut seen = std::collections::HashSet::new();
    indices.iter().find(|&&idx| !seen.insert(idx)).copied()
}

/// Checks completeness relation for measurement operators.
///
/// Verifies if $\sum M_k^\dagger M_k = I$.
pub fn check_completeness(ops: &[Array2<Complex64>], dim: usize) -> bool {
    let eye = Array2::<Complex64>::eye(dim);
    let sum = ops
        .iter()
        .fold(Array2::<Complex64>::zeros((dim, dim)), |acc, op| {
            acc + dagger(op).dot(op)
        });
    sum.iter()
        .zip(eye.iter())
        .all(|(a, b)| (a - b).norm() < 1e-9)
}

/// Computes the outer product of two vectors $|a\rangle\langle b|$.
pub fn outer_product(a: &Array1<Complex64>, b: &Array1<Complex64>) -> Array2<Complex64> {
    let n = a.len();
    let m = b.len();
    let mut res = Array2::zeros((n, m));

    for i in 0..n {
        for j in 0..m {
            res[[i, j]] = a[i] * b[j].conj();
        }
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    #[test]
    fn extract_and_deposit_are_inverse_on_targets() {
        let targets = [0, 2];
        // 0b101 -> bits 0 and 2 set -> compact 0b11
        assert_eq!(extract_bits(0b101, &targets), 0b11);
        assert_eq!(deposit_bits(0b11, &targets), 0b101);
        assert_eq!(extract_bits(0b010, &targets), 0);
    }

    #[test]
    fn find_duplicate_reports_first_repeat() {
        assert_eq!(find_duplicate(&[0, 1, 2]), None);
        assert_eq!(find_duplicate(&[2, 0, 2]), Some(2));
    }

    #[test]
    fn expanded_cnot_matches_textbook_matrix() {
        let x = array![[c(0.0), c(1.0)], [c(1.0), c(0.0)]];
        // control 0, target 1: |01> (index 1) <-> |11> (index 3)
        let cnot = expand_operator(2, &x, &[1], &[0]);
        assert_eq!(cnot[[0, 0]], c(1.0));
        assert_eq!(cnot[[2, 2]], c(1.0));
        assert_eq!(cnot[[3, 1]], c(1.0));
        assert_eq!(cnot[[1, 3]], c(1.0));
        assert_eq!(cnot[[1, 1]], c(0.0));
    }

    #[test]
    fn computational_projectors_are_complete() {
        let v0 = array![c(1.0), c(0.0)];
        let v1 = array![c(0.0), c(1.0)];
        let ops = vec![outer_product(&v0, &v0), outer_product(&v1, &v1)];
        assert!(check_completeness(&ops, 2));
        assert!(!check_completeness(&ops[..1], 2));
        assert_eq!(trace(&ops[0]), c(1.0));
    }
}
