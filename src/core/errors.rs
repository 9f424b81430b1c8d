use num_complex::Complex64;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum GateError {
    #[error("Matrix is not Unitary (U†U != I)")]
    NonUnitary,

    #[error("Matrix must be square")]
    NotSquareMatrix,

    #[error("Invalid Dimensions")]
    InvalidDimensions,

    #[error("Qubit {0} cannot be both control and target")]
    ControlTargetOverlap(usize),

    #[error("Duplicate qubit index found: {0}")]
    DuplicateQubit(usize),
}

#[derive(Error, Debug, Clone)]
pub enum MeasurementError {
    #[error("Number of operators ({ops}) does not match number of values ({vals})")]
    CountMismatch { ops: usize, vals: usize },

    #[error("Measurement operators do not sum to Identity (Completeness relation failed)")]
    NotComplete,

    #[error("Invalid operator dimensions")]
    InvalidDimensions,

    #[error("Measurement acts on {expected} qubit(s) but {got} target(s) were given")]
    TargetMismatch { expected: usize, got: usize },

    #[error("Duplicate qubit index found: {0}")]
    DuplicateQubit(usize),
}

#[derive(Error, Debug, Clone)]
pub enum StateError {
    #[error("Trace is not unity: {0}")]
    InvalidTrace(Complex64),

    #[error("Invalid dimensions")]
    InvalidDimensions,

    #[error("Dimension mismatch")]
    DimensionMismatch {
        expected: usize,
        got_rows: usize,
        got_cols: usize,
    },

    #[error("Qubit index out of bounds")]
    IndexOutOfBounds { index: usize, num_qubits: usize },

    #[error("Measurement error: {0}")]
    MeasurementError(#[from] MeasurementError),

    #[error("Gate error: {0}")]
    GateError(#[from] GateError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CircuitError {
    #[error("Register '{0}' already exists in this circuit")]
    DuplicateRegister(String),

    #[error("Register '{0}' must hold at least one bit")]
    EmptyRegister(String),

    #[error("Qubit {index} out of range for a circuit with {num_qubits} qubit(s)")]
    QubitOutOfRange { index: usize, num_qubits: usize },

    #[error("Classical bit {index} out of range for a circuit with {num_clbits} bit(s)")]
    ClbitOutOfRange { index: usize, num_clbits: usize },

    #[error("Qubit {0} used more than once in a single operation")]
    DuplicateQubit(usize),

    #[error("Register condition value {value} does not fit in {width} bit(s)")]
    ConditionOverflow { value: u64, width: usize },

    #[error("Barriers cannot be classically conditioned")]
    ConditionOnBarrier,
}

#[derive(Error, Debug, Clone)]
pub enum SimulationError {
    #[error("Number of shots must be at least 1")]
    NoShots,

    #[error("Circuit has no qubits")]
    EmptyCircuit,

    #[error("Circuit has {num_qubits} qubits; the density-matrix backend supports at most {max}")]
    TooManyQubits { num_qubits: usize, max: usize },

    #[error("Invalid circuit: {0}")]
    Circuit(#[from] CircuitError),

    #[error("State error: {0}")]
    State(#[from] StateError),

    #[error("Gate error: {0}")]
    Gate(#[from] GateError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown argument '{0}'")]
    UnknownArgument(String),

    #[error("Missing value for '{0}'")]
    MissingValue(String),

    #[error("Invalid value '{value}' for '{flag}'")]
    InvalidValue { flag: String, value: String },

    #[error("Unknown state '{0}' (expected zero, one, plus, minus, plus-i or minus-i)")]
    UnknownState(String),

    #[error("Number of shots must be at least 1")]
    NoShots,
}
