//! CLI command implementations.

pub mod common;
pub mod compile;
pub mod oracle;
pub mod run;
pub mod synth;
pub mod version;
