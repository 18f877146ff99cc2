//! `PropertySet` and related types for pass communication.
//!
//! Passes share configuration and findings through a [`PropertySet`]: the
//! ancilla analysis records how many helper qubits the basis translation must
//! allocate, the rotation count pass records how many `rz`/`p` gates share the
//! error budget, and the synthesis pass records diagnostics.
//!
//! # Examples
//!
//! ```
//! use qhe_compile::{AncillaPlacement, ErrorBudget, PropertySet};
//!
//! let props = PropertySet::new()
//!     .with_error_budget(ErrorBudget::Circuit(1e-3))
//!     .with_ancilla_placement(AncillaPlacement::Top);
//!
//! assert_eq!(props.error_budget.per_gate(4), Some(2.5e-4));
//! ```
//!
//! Custom properties are keyed by type:
//!
//! ```
//! use qhe_compile::PropertySet;
//!
//! #[derive(Debug, PartialEq)]
//! struct Marker(u8);
//!
//! let mut props = PropertySet::new();
//! props.insert(Marker(7));
//! assert_eq!(props.get::<Marker>(), Some(&Marker(7)));
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::fmt;
use std::path::PathBuf;

use crate::error::{CompileError, CompileResult};

/// Approximation budget for rotation synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ErrorBudget {
    /// Use the oracle's own default precision.
    #[default]
    Default,
    /// Total error for the whole circuit, split evenly over its rotations.
    Circuit(f64),
    /// Error for each rotation.
    PerGate(f64),
}

impl ErrorBudget {
    /// Build a budget from the two optional user inputs.
    ///
    /// Supplying both is ambiguous and rejected before any work is done.
    pub fn from_options(circuit: Option<f64>, gate: Option<f64>) -> CompileResult<Self> {
        let budget = match (circuit, gate) {
            (Some(_), Some(_)) => return Err(CompileError::AmbiguousErrorBudget),
            (Some(e), None) => ErrorBudget::Circuit(e),
            (None, Some(e)) => ErrorBudget::PerGate(e),
            (None, None) => ErrorBudget::Default,
        };
        budget.validate()?;
        Ok(budget)
    }

    fn validate(self) -> CompileResult<()> {
        match self {
            ErrorBudget::Circuit(e) | ErrorBudget::PerGate(e) if !(e.is_finite() && e > 0.0) => {
                Err(CompileError::InvalidErrorBudget(e))
            }
            _ => Ok(()),
        }
    }

    /// Tolerance handed to the oracle for each of `rotations` gates.
    #[allow(clippy::cast_precision_loss)]
    pub fn per_gate(self, rotations: usize) -> Option<f64> {
        match self {
            ErrorBudget::Default => None,
            ErrorBudget::PerGate(e) => Some(e),
            ErrorBudget::Circuit(e) => Some(e / rotations.max(1) as f64),
        }
    }
}

/// Where the `anc` register goes relative to the circuit's own registers.
///
/// Placement only affects qubit numbering, never semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AncillaPlacement {
    /// Before every other quantum register.
    Top,
    /// After every other quantum register.
    #[default]
    Bottom,
}

/// Non-fatal findings reported alongside a compiled circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Diagnostic {
    /// Rotation synthesis was requested but no oracle binary was found.
    /// The circuit still contains its `rz`/`p` gates.
    OracleUnavailable {
        /// Where the oracle was looked for.
        path: PathBuf,
        /// Number of rotations left unsynthesized.
        rotations: usize,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::OracleUnavailable { path, rotations } => write!(
                f,
                "rotation oracle not installed at {}; {rotations} rotation(s) left in place",
                path.display()
            ),
        }
    }
}

/// Ancilla demand of a circuit, written by the ancilla analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AncillaRequirement {
    /// Largest control count over all `mcx` gates.
    pub max_controls: u32,
    /// Size of the `anc` register: `max(0, max_controls - 2)`.
    pub ancillas: u32,
}

/// Number of `rz`/`p` gates awaiting synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RotationCount(pub usize);

/// Outcome of rotation synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SynthesisReport {
    /// Rotations replaced by Clifford+T sequences.
    pub synthesized: usize,
    /// Oracle invocations (repeated angles are served from cache).
    pub oracle_calls: usize,
    /// Largest phase-insensitive operator distance to the exact rotation.
    pub max_error: f64,
}

/// Properties shared between compilation passes.
///
/// # Standard Properties
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `error_budget` | [`ErrorBudget`] | Synthesis precision |
/// | `ancilla_placement` | [`AncillaPlacement`] | Position of the `anc` register |
/// | `diagnostics` | `Vec<Diagnostic>` | Non-fatal findings |
///
/// Passes can store arbitrary data using [`insert`](Self::insert) and
/// [`get`](Self::get). Each type can have at most one value stored.
#[derive(Debug, Default)]
pub struct PropertySet {
    /// Synthesis precision.
    pub error_budget: ErrorBudget,

    /// Position of the `anc` register.
    pub ancilla_placement: AncillaPlacement,

    /// Non-fatal findings collected while compiling.
    pub diagnostics: Vec<Diagnostic>,

    custom: FxHashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl PropertySet {
    /// Create a new empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the error budget.
    #[must_use]
    pub fn with_error_budget(mut self, budget: ErrorBudget) -> Self {
        self.error_budget = budget;
        self
    }

    /// Set the ancilla placement.
    #[must_use]
    pub fn with_ancilla_placement(mut self, placement: AncillaPlacement) -> Self {
        self.ancilla_placement = placement;
        self
    }

    /// Insert a custom property.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.custom.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Get a custom property.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.custom
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Get a mutable custom property.
    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.custom
            .get_mut(&TypeId::of::<T>())
            .and_then(|v| v.downcast_mut())
    }

    /// Remove a custom property.
    pub fn remove<T: Any>(&mut self) -> Option<T> {
        self.custom
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|v| *v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_budget_from_options() {
        assert_eq!(
            ErrorBudget::from_options(None, None).unwrap(),
            ErrorBudget::Default
        );
        assert_eq!(
            ErrorBudget::from_options(Some(0.1), None).unwrap(),
            ErrorBudget::Circuit(0.1)
        );
        assert_eq!(
            ErrorBudget::from_options(None, Some(0.01)).unwrap(),
            ErrorBudget::PerGate(0.01)
        );
        assert!(matches!(
            ErrorBudget::from_options(Some(0.1), Some(0.01)),
            Err(CompileError::AmbiguousErrorBudget)
        ));
        assert!(matches!(
            ErrorBudget::from_options(Some(-1.0), None),
            Err(CompileError::InvalidErrorBudget(_))
        ));
    }

    #[test]
    fn test_error_budget_split() {
        assert_eq!(ErrorBudget::Default.per_gate(10), None);
        assert_eq!(ErrorBudget::PerGate(1e-4).per_gate(10), Some(1e-4));
        assert_eq!(ErrorBudget::Circuit(1e-3).per_gate(4), Some(2.5e-4));
        // A budget with nothing to split over is handed over whole.
        assert_eq!(ErrorBudget::Circuit(1e-3).per_gate(0), Some(1e-3));
    }

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::OracleUnavailable {
            path: PathBuf::from("/opt/gridsynth"),
            rotations: 3,
        };
        assert!(d.to_string().contains("/opt/gridsynth"));
        assert!(d.to_string().contains("3 rotation(s)"));
    }

    #[test]
    #[allow(clippy::items_after_statements)]
    fn test_property_set_custom() {
        let mut props = PropertySet::new();

        #[derive(Debug, PartialEq)]
        struct CustomData(i32);

        props.insert(CustomData(42));
        assert_eq!(props.get::<CustomData>(), Some(&CustomData(42)));

        let removed = props.remove::<CustomData>();
        assert_eq!(removed, Some(CustomData(42)));
        assert_eq!(props.get::<CustomData>(), None);
    }
}
