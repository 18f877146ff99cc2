//! Quantum gate types.

use serde::{Deserialize, Serialize};

use crate::qubit::ClbitId;

/// Standard gates with known semantics.
///
/// The vocabulary is closed: the compiler, the key-update engine and the
/// simulator all match on it exhaustively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    // Pauli gates
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford+T gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,

    // Single-qubit rotation gates
    /// Rotation around X axis.
    Rx(f64),
    /// Rotation around Y axis.
    Ry(f64),
    /// Rotation around Z axis.
    Rz(f64),
    /// Phase gate.
    P(f64),
    /// Universal single-qubit gate U(θ, φ, λ).
    U(f64, f64, f64),

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Y gate.
    CY,
    /// Controlled-Z gate.
    CZ,
    /// Controlled-Hadamard gate.
    CH,
    /// SWAP gate.
    Swap,
    /// Controlled rotation around X.
    CRx(f64),
    /// Controlled rotation around Y.
    CRy(f64),
    /// Controlled rotation around Z.
    CRz(f64),
    /// Controlled phase gate.
    CP(f64),

    // Multi-qubit gates
    /// Toffoli gate (CCX).
    CCX,
    /// Multi-controlled X. Operands are the controls followed by the target.
    Mcx {
        /// Number of control qubits.
        controls: u32,
    },
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::P(_) => "p",
            StandardGate::U(_, _, _) => "u",
            StandardGate::CX => "cx",
            StandardGate::CY => "cy",
            StandardGate::CZ => "cz",
            StandardGate::CH => "ch",
            StandardGate::Swap => "swap",
            StandardGate::CRx(_) => "crx",
            StandardGate::CRy(_) => "cry",
            StandardGate::CRz(_) => "crz",
            StandardGate::CP(_) => "cp",
            StandardGate::CCX => "ccx",
            StandardGate::Mcx { .. } => "mcx",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::Rx(_)
            | StandardGate::Ry(_)
            | StandardGate::Rz(_)
            | StandardGate::P(_)
            | StandardGate::U(_, _, _) => 1,

            StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::CH
            | StandardGate::Swap
            | StandardGate::CRx(_)
            | StandardGate::CRy(_)
            | StandardGate::CRz(_)
            | StandardGate::CP(_) => 2,

            StandardGate::CCX => 3,
            StandardGate::Mcx { controls } => controls + 1,
        }
    }

    /// Get the angles of this gate.
    pub fn parameters(&self) -> Vec<f64> {
        match self {
            StandardGate::Rx(p)
            | StandardGate::Ry(p)
            | StandardGate::Rz(p)
            | StandardGate::P(p)
            | StandardGate::CRx(p)
            | StandardGate::CRy(p)
            | StandardGate::CRz(p)
            | StandardGate::CP(p) => vec![*p],

            StandardGate::U(a, b, c) => vec![*a, *b, *c],

            _ => vec![],
        }
    }

    /// Whether the gate belongs to {X, Z, H, S, S†, T, T†, CX}.
    #[inline]
    pub fn is_fixed_basis(&self) -> bool {
        matches!(
            self,
            StandardGate::X
                | StandardGate::Z
                | StandardGate::H
                | StandardGate::S
                | StandardGate::Sdg
                | StandardGate::T
                | StandardGate::Tdg
                | StandardGate::CX
        )
    }

    /// Whether the gate is a Z-axis rotation awaiting synthesis.
    #[inline]
    pub fn is_rotation(&self) -> bool {
        matches!(self, StandardGate::Rz(_) | StandardGate::P(_))
    }

    /// Whether the gate is T or T†.
    #[inline]
    pub fn is_t_like(&self) -> bool {
        matches!(self, StandardGate::T | StandardGate::Tdg)
    }
}

/// A quantum gate, either standard or custom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateKind {
    /// A standard gate with known semantics.
    Standard(StandardGate),
    /// An opaque user-named gate.
    Custom(CustomGate),
}

impl GateKind {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            GateKind::Standard(g) => g.name(),
            GateKind::Custom(g) => &g.name,
        }
    }

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            GateKind::Standard(g) => g.num_qubits(),
            GateKind::Custom(g) => g.num_qubits,
        }
    }
}

/// An opaque gate the toolkit carries but cannot translate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomGate {
    /// The name of the gate.
    pub name: String,
    /// The number of qubits it operates on.
    pub num_qubits: u32,
    /// Parameters of the gate.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<f64>,
}

impl CustomGate {
    /// Create a new custom gate.
    pub fn new(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            params: vec![],
        }
    }

    /// Add parameters to the gate.
    #[must_use]
    pub fn with_params(mut self, params: Vec<f64>) -> Self {
        self.params = params;
        self
    }
}

/// Classical predicate on a single bit.
///
/// A conditioned gate fires only when the bit reads 1 at the moment the
/// gate is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassicalCondition {
    /// The bit that must be set.
    pub clbit: ClbitId,
}

impl ClassicalCondition {
    /// Create a new classical condition on `clbit`.
    pub fn new(clbit: ClbitId) -> Self {
        Self { clbit }
    }
}

/// A gate with associated metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// The kind of gate.
    pub kind: GateKind,
    /// Optional label for the gate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Optional classical condition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ClassicalCondition>,
}

impl Gate {
    /// Create a new gate from a standard gate.
    pub fn standard(gate: StandardGate) -> Self {
        Self {
            kind: GateKind::Standard(gate),
            label: None,
            condition: None,
        }
    }

    /// Create a new gate from a custom gate.
    pub fn custom(gate: CustomGate) -> Self {
        Self {
            kind: GateKind::Custom(gate),
            label: None,
            condition: None,
        }
    }

    /// Add a label to the gate.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Add a classical condition to the gate.
    #[must_use]
    pub fn with_condition(mut self, condition: ClassicalCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Get the name of this gate.
    pub fn name(&self) -> &str {
        self.kind.name()
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.kind.num_qubits()
    }

    /// The standard gate, if this is one.
    pub fn as_standard(&self) -> Option<&StandardGate> {
        match &self.kind {
            GateKind::Standard(g) => Some(g),
            GateKind::Custom(_) => None,
        }
    }
}

impl From<StandardGate> for Gate {
    fn from(gate: StandardGate) -> Self {
        Gate::standard(gate)
    }
}

impl From<CustomGate> for Gate {
    fn from(gate: CustomGate) -> Self {
        Gate::custom(gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_standard_gate_properties() {
        assert_eq!(StandardGate::H.num_qubits(), 1);
        assert_eq!(StandardGate::CX.num_qubits(), 2);
        assert_eq!(StandardGate::CCX.num_qubits(), 3);
        assert_eq!(StandardGate::Mcx { controls: 4 }.num_qubits(), 5);

        assert_eq!(StandardGate::Rz(PI).parameters(), vec![PI]);
        assert_eq!(StandardGate::U(1.0, 2.0, 3.0).parameters().len(), 3);
        assert!(StandardGate::H.parameters().is_empty());
    }

    #[test]
    fn test_fixed_basis_classification() {
        for g in [
            StandardGate::X,
            StandardGate::Z,
            StandardGate::H,
            StandardGate::S,
            StandardGate::Sdg,
            StandardGate::T,
            StandardGate::Tdg,
            StandardGate::CX,
        ] {
            assert!(g.is_fixed_basis(), "{} should be fixed-basis", g.name());
        }
        assert!(!StandardGate::Y.is_fixed_basis());
        assert!(!StandardGate::Rz(0.1).is_fixed_basis());
        assert!(StandardGate::P(0.1).is_rotation());
        assert!(StandardGate::Tdg.is_t_like());
        assert!(!StandardGate::S.is_t_like());
    }

    #[test]
    fn test_gate_condition() {
        let gate = Gate::standard(StandardGate::X).with_condition(ClassicalCondition::new(ClbitId(2)));
        assert_eq!(gate.name(), "x");
        assert_eq!(gate.condition.map(|c| c.clbit), Some(ClbitId(2)));
        assert!(gate.as_standard().is_some());
    }

    #[test]
    fn test_custom_gate() {
        let gate = Gate::custom(CustomGate::new("oracle", 3).with_params(vec![0.5]));
        assert_eq!(gate.name(), "oracle");
        assert_eq!(gate.num_qubits(), 3);
        assert!(gate.as_standard().is_none());
    }
}
