use crate::core::Gate;
use crate::core::errors::StateError;
use crate::core::measurements::{Measurement, MeasurementResult};
use crate::core::utils::{dagger, trace};
use ndarray::Array2;
use num_complex::Complex64;
use rand::Rng;

#[derive(Clone, Debug)]
pub struct QuantumState {
    pub density_matrix: Array2<Complex64>,
    pub num_qubits: usize,
}

impl QuantumState {
    /// Creates a new quantum state initialized to |0...0>.
    pub fn new(num_qubits: usize) -> Self {
        let dim = 1 << num_qubits;
        let mut density_matrix = Array2::<Complex64>::zeros((dim, dim));
        density_matrix[[0, 0]] = Complex64::new(1.0, 0.0);

        Self {
            density_matrix,
            num_qubits,
        }
    }

    /// Checks the validity of a density matrix
    fn check_density_matrix(matrix: &Array2<Complex64>) -> Result<(), StateError> {
        let (rows, cols) = matrix.dim();

        if rows != cols {
            return Err(StateError::DimensionMismatch {
                expected: rows,
                got_rows: rows,
                got_cols: cols,
            });
        }
        if !rows.is_power_of_two() {
            return Err(StateError::InvalidDimensions);
        }

        let tr = trace(matrix);
        if (tr - Complex64::new(1.0, 0.0)).norm() > 1e-9 {
            return Err(StateError::InvalidTrace(tr));
        }

        Ok(())
    }

    /// Checks if a given index is within the system QuantumState's range
    fn validate_qubit_index(&self, index: usize) -> Result<(), StateError> {
        if index >= self.num_qubits {
            return Err(StateError::IndexOutOfBounds {
                index,
                num_qubits: self.num_qubits,
            });
        }
        Ok(())
    }

    /// Checks if a QuantumState is valid.
    pub fn is_valid(&self) -> Result<(), StateError> {
        Self::check_density_matrix(&self.density_matrix)
    }

    /// Applies an operator already expanded to the whole system: ρ → UρU†
    pub fn apply_expanded(&mut self, u: &Array2<Complex64>) -> Result<(), StateError> {
        let (rows, cols) = u.dim();
        let dim = 1 << self.num_qubits;

        if rows != dim || cols != dim {
            return Err(StateError::DimensionMismatch {
                expected: dim,
                got_rows: rows,
                got_cols: cols,
            });
        }

        self.density_matrix = u.dot(&self.density_matrix).dot(&dagger(u));
        Ok(())
    }

    /// Applies non controlled quantum gate
    pub fn apply(&mut self, gate: &Gate, target_qubits: &[usize]) -> Result<(), StateError> {
        self.apply_controlled(gate, target_qubits, &[])
    }

    /// Applies a gate to `target_qubits`, active only when every control is |1>
    pub fn apply_controlled(
        &mut self,
        gate: &Gate,
        target_qubits: &[usize],
        control_qubits: &[usize],
    ) -> Result<(), StateError> {
        for &q in target_qubits.iter().chain(control_qubits) {
            self.validate_qubit_index(q)?;
        }

        let full = Gate::expand_gate(self.num_qubits, gate, target_qubits, control_qubits)?;
        self.apply_expanded(&full.matrix)
    }

    /// Probability of each basis state (diagonal of ρ).
    pub fn probabilities(&self) -> Vec<f64> {
        self.density_matrix.diag().iter().map(|c| c.re.max(0.0)).collect()
    }

    /// Returns the probability of each outcome together with the expanded operators
    pub fn outcome_probabilities(
        &self,
        measurement: &Measurement,
        target_qubits: &[usize],
    ) -> Result<(Vec<f64>, Vec<Array2<Complex64>>), StateError> {
        for &q in target_qubits {
            self.validate_qubit_index(q)?;
        }

        let expanded_ops = measurement.get_expanded_operators(self.num_qubits, target_qubits)?;

        let mut probs: Vec<f64> = expanded_ops
            .iter()
            .map(|op| {
                let projected = op.dot(&self.density_matrix).dot(&dagger(op));
                trace(&projected).re.max(0.0)
            })
            .collect();

        // Floating point drift: renormalize so the outcomes sum to one
        let sum_probs: f64 = probs.iter().sum();
        if sum_probs < 1e-12 {
            return Err(StateError::InvalidTrace(Complex64::new(sum_probs, 0.0)));
        }
        for p in &mut probs {
            *p /= sum_probs;
        }

        Ok((probs, expanded_ops))
    }

    /// Randomly selects an outcome index weighted by `probs`
    fn pick_outcome<R: Rng>(probs: &[f64], rng: &mut R) -> usize {
        let roll: f64 = rng.random();

        let mut cumulative = 0.0;
        for (i, &p) in probs.iter().enumerate() {
            cumulative += p;
            if roll < cumulative {
                return i;
            }
        }
        // Rounding left `roll` above the last cumulative sum: take the last
        // outcome that can actually occur.
        probs
            .iter()
            .rposition(|&p| p > 0.0)
            .unwrap_or(probs.len().saturating_sub(1))
    }

    /// Physical measurement which changes the state irretrievably
    pub fn measure<R: Rng>(
        &mut self,
        measurement: &Measurement,
        target_qubits: &[usize],
        rng: &mut R,
    ) -> Result<MeasurementResult, StateError> {
        let (probs, ops) = self.outcome_probabilities(measurement, target_qubits)?;

        let outcome_idx = Self::pick_outcome(&probs, rng);
        let p_selected = probs[outcome_idx];

        if p_selected <= 1e-12 {
            return Err(StateError::InvalidTrace(Complex64::new(0.0, 0.0)));
        }

        // rho' = (M_k * rho * M_k†) / p_k
        let m_k = &ops[outcome_idx];
        let numerator = m_k.dot(&self.density_matrix).dot(&dagger(m_k));
        let scale = Complex64::new(p_selected, 0.0);
        self.density_matrix = numerator.mapv(|val| val / scale);

        Ok(MeasurementResult { index: outcome_idx })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn nearly_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-10
    }

    #[test]
    fn initial_state_is_all_zeros() {
        let state = QuantumState::new(3);
        let probs = state.probabilities();
        assert_eq!(probs.len(), 8);
        assert!(nearly_eq(probs[0], 1.0));
        assert!(state.is_valid().is_ok());
    }

    #[test]
    fn bell_pair_probabilities() {
        let mut state = QuantumState::new(2);
        state.apply(&Gate::h(), &[0]).unwrap();
        state.apply_controlled(&Gate::x(), &[1], &[0]).unwrap();

        let probs = state.probabilities();
        assert!(nearly_eq(probs[0b00], 0.5));
        assert!(nearly_eq(probs[0b01], 0.0));
        assert!(nearly_eq(probs[0b10], 0.0));
        assert!(nearly_eq(probs[0b11], 0.5));
    }

    #[test]
    fn measurement_collapses_entangled_partner() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let mut state = QuantumState::new(2);
            state.apply(&Gate::h(), &[0]).unwrap();
            state.apply_controlled(&Gate::x(), &[1], &[0]).unwrap();

            let first = state.measure(&Measurement::z_basis(), &[0], &mut rng).unwrap();
            let second = state.measure(&Measurement::z_basis(), &[1], &mut rng).unwrap();
            assert_eq!(first.index, second.index);
            assert!(state.is_valid().is_ok());
        }
    }

    #[test]
    fn y_basis_measurement_identifies_plus_i() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            let mut state = QuantumState::new(1);
            state.apply(&Gate::h(), &[0]).unwrap();
            state.apply(&Gate::s(), &[0]).unwrap();
            let res = state.measure(&Measurement::y_basis(), &[0], &mut rng).unwrap();
            assert_eq!(res.index, 0);
        }
    }

    #[test]
    fn out_of_range_qubit_is_an_error() {
        let mut state = QuantumState::new(2);
        let err = state.apply(&Gate::x(), &[2]).unwrap_err();
        assert!(matches!(
            err,
            StateError::IndexOutOfBounds {
                index: 2,
                num_qubits: 2
            }
        ));
    }

    #[test]
    fn pick_outcome_never_selects_impossible_outcome() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let idx = QuantumState::pick_outcome(&[0.0, 1.0, 0.0], &mut rng);
            assert_eq!(idx, 1);
        }
    }
}
