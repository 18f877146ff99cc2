//! Rotation oracle abstraction and capability probing.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::error::CompileResult;
use crate::synthesis::gridsynth::{GridsynthOracle, default_binary_path};

/// Numeric synthesizer of single-qubit Z rotations.
///
/// Implementations return the raw Clifford+T word for `Rz(angle)` in
/// operator order (rightmost symbol applied first), over the alphabet
/// {H, S, T, X, Z, I}. Identical arguments must produce identical output.
pub trait RotationOracle: Send + Sync + fmt::Debug {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Synthesize `Rz(angle)` up to global phase.
    ///
    /// `tolerance` of `None` leaves the precision to the oracle's default.
    fn synthesize(&self, angle: f64, tolerance: Option<f64>, seed: Option<u64>)
    -> CompileResult<String>;
}

/// Whether a rotation oracle can be used, probed once and passed around.
#[derive(Clone)]
pub enum OracleCapability {
    /// A ready oracle.
    Available(Arc<dyn RotationOracle>),
    /// No oracle found at the probed location.
    Unavailable {
        /// Location that was probed.
        path: PathBuf,
    },
}

impl OracleCapability {
    /// Probe the default gridsynth location (`~/.cqc_qhe/bin`).
    pub fn detect() -> Self {
        Self::detect_at(default_binary_path())
    }

    /// Probe a specific gridsynth binary.
    pub fn detect_at(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        if path.is_file() {
            debug!("gridsynth found at {}", path.display());
            Self::Available(Arc::new(GridsynthOracle::new(path)))
        } else {
            debug!("gridsynth not found at {}", path.display());
            Self::Unavailable { path }
        }
    }

    /// Wrap an already constructed oracle.
    pub fn available(oracle: impl RotationOracle + 'static) -> Self {
        Self::Available(Arc::new(oracle))
    }

    /// Whether an oracle is usable.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    /// The oracle, if available.
    pub fn oracle(&self) -> Option<&dyn RotationOracle> {
        match self {
            Self::Available(oracle) => Some(oracle.as_ref()),
            Self::Unavailable { .. } => None,
        }
    }
}

impl fmt::Debug for OracleCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available(oracle) => f.debug_tuple("Available").field(oracle).finish(),
            Self::Unavailable { path } => f
                .debug_struct("Unavailable")
                .field("path", path)
                .finish(),
        }
    }
}
