//! Built-in compilation passes.

mod ancilla;
mod basis;
mod rotation;

pub use ancilla::{ANCILLA_REGISTER, AncillaAnalysis};
pub use basis::{BasisTranslation, translate_instruction};
pub use rotation::{RotationCounter, RotationSynthesis};
