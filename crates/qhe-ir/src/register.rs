//! Named quantum and classical registers.

use serde::{Deserialize, Serialize};

/// A contiguous block of flat identifiers addressed by name.
///
/// Registers never overlap: a circuit hands out identifiers in declaration
/// order, so `start..start + size` is exclusive to this register.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Register {
    /// Register name, unique among registers of the same kind.
    pub name: String,
    /// First flat identifier covered by the register.
    pub start: u32,
    /// Number of bits in the register.
    pub size: u32,
}

impl Register {
    /// Create a new register descriptor.
    pub fn new(name: impl Into<String>, start: u32, size: u32) -> Self {
        Self {
            name: name.into(),
            start,
            size,
        }
    }

    /// Flat identifier of the bit at `offset`, if in range.
    #[inline]
    pub fn at(&self, offset: u32) -> Option<u32> {
        (offset < self.size).then_some(self.start + offset)
    }

    /// Whether a flat identifier falls inside this register.
    #[inline]
    pub fn contains(&self, id: u32) -> bool {
        id >= self.start && id < self.start + self.size
    }

    /// Iterate over the flat identifiers of this register.
    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.start..self.start + self.size
    }

    /// Whether the register holds no bits.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}

/// Name and size of a register, without placement.
///
/// This is the form registers take in serialized circuits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterDecl {
    /// Register name.
    pub name: String,
    /// Number of bits.
    pub size: u32,
}

impl From<&Register> for RegisterDecl {
    fn from(reg: &Register) -> Self {
        Self {
            name: reg.name.clone(),
            size: reg.size,
        }
    }
}
