//! Rotation synthesis: Rz angles to Clifford+T words via an external oracle.

pub mod gridsynth;
pub mod oracle;
pub mod sequence;

pub use gridsynth::GridsynthOracle;
pub use oracle::{OracleCapability, RotationOracle};
pub use sequence::{
    DEFAULT_SEED, GateSequence, SynthesisOptions, collapse_phases, normalize_angle, synthesize_rz,
};
