use std::ops::Index;

/// Handle to a qubit, holding its circuit-wide index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Qubit(pub(crate) usize);

impl Qubit {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Handle to a classical bit, holding its circuit-wide index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Clbit(pub(crate) usize);

impl Clbit {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Named, ordered group of qubits owned by a circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantumRegister {
    name: String,
    qubits: Vec<Qubit>,
}

impl QuantumRegister {
    pub(crate) fn new(name: &str, start: usize, size: usize) -> Self {
        Self {
            name: name.to_string(),
            qubits: (start..start + size).map(Qubit).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.qubits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.qubits.is_empty()
    }

    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }
}

impl Index<usize> for QuantumRegister {
    type Output = Qubit;

    fn index(&self, i: usize) -> &Qubit {
        &self.qubits[i]
    }
}

/// Named, ordered group of classical bits owned by a circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassicalRegister {
    name: String,
    clbits: Vec<Clbit>,
}

impl ClassicalRegister {
    pub(crate) fn new(name: &str, start: usize, size: usize) -> Self {
        Self {
            name: name.to_string(),
            clbits: (start..start + size).map(Clbit).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.clbits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clbits.is_empty()
    }

    pub fn clbits(&self) -> &[Clbit] {
        &self.clbits
    }
}

impl Index<usize> for ClassicalRegister {
    type Output = Clbit;

    fn index(&self, i: usize) -> &Clbit {
        &self.clbits[i]
    }
}
