//! Qubit and classical bit types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Flat identifier for a qubit within a circuit.
///
/// Identifiers are assigned in register declaration order, so the first
/// qubit of the first declared register is always `q0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl QubitId {
    /// The identifier as a vector index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

/// Flat identifier for a classical bit within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClbitId(pub u32);

impl ClbitId {
    /// The identifier as a vector index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ClbitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl From<u32> for ClbitId {
    fn from(id: u32) -> Self {
        ClbitId(id)
    }
}

/// A quantum bit together with its register membership.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Qubit {
    /// The flat identifier.
    pub id: QubitId,
    /// The name of the owning register.
    pub register: String,
    /// The offset within the register.
    pub index: u32,
}

impl Qubit {
    /// Create a new qubit belonging to `register` at `index`.
    pub fn new(id: QubitId, register: impl Into<String>, index: u32) -> Self {
        Self {
            id,
            register: register.into(),
            index,
        }
    }
}

impl fmt::Display for Qubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.register, self.index)
    }
}

/// A classical bit together with its register membership.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clbit {
    /// The flat identifier.
    pub id: ClbitId,
    /// The name of the owning register.
    pub register: String,
    /// The offset within the register.
    pub index: u32,
}

impl Clbit {
    /// Create a new classical bit belonging to `register` at `index`.
    pub fn new(id: ClbitId, register: impl Into<String>, index: u32) -> Self {
        Self {
            id,
            register: register.into(),
            index,
        }
    }
}

impl fmt::Display for Clbit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.register, self.index)
    }
}
