//! What a backend can run.

use serde::{Deserialize, Serialize};

/// Gate names a backend executes, in `qhe_ir` naming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSet {
    /// Supported gate names.
    pub gates: Vec<String>,
}

impl GateSet {
    /// Every standard gate.
    pub fn universal() -> Self {
        let names = [
            "x", "y", "z", "h", "s", "sdg", "t", "tdg", "rx", "ry", "rz", "p", "u", "cx", "cy",
            "cz", "ch", "swap", "crx", "cry", "crz", "cp", "ccx", "mcx",
        ];
        Self {
            gates: names.iter().map(|&n| n.to_string()).collect(),
        }
    }

    /// Check if a gate is supported.
    pub fn contains(&self, gate: &str) -> bool {
        self.gates.iter().any(|g| g == gate)
    }
}

/// Hardware capabilities of a backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the backend.
    pub name: String,
    /// Number of qubits available.
    pub num_qubits: u32,
    /// Supported gates.
    pub gate_set: GateSet,
    /// Maximum number of shots per job.
    pub max_shots: u32,
    /// Whether this is a simulator.
    pub is_simulator: bool,
}

impl Capabilities {
    /// A statevector simulator running every standard gate.
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "simulator".into(),
            num_qubits,
            gate_set: GateSet::universal(),
            max_shots: 1_000_000,
            is_simulator: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulator_capabilities() {
        let caps = Capabilities::simulator(24);
        assert!(caps.is_simulator);
        assert_eq!(caps.num_qubits, 24);
        assert!(caps.gate_set.contains("mcx"));
        assert!(!caps.gate_set.contains("measure"));
    }
}
