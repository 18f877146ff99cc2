//! Decoding oracle output into Clifford+T gate sequences.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use qhe_ir::StandardGate;

use crate::error::{CompileError, CompileResult};
use crate::synthesis::oracle::RotationOracle;
use crate::unitary::Unitary2x2;

/// Default oracle seed.
pub const DEFAULT_SEED: u64 = 32;

/// Knobs for a single synthesis request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SynthesisOptions {
    /// Approximation error; `None` defers to the oracle (1e-10 for gridsynth).
    pub tolerance: Option<f64>,
    /// Oracle seed.
    pub seed: Option<u64>,
    /// Rewrite `SSS` to `SZ` and then `SS` to `Z`.
    pub collapse_phases: bool,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            tolerance: None,
            seed: Some(DEFAULT_SEED),
            collapse_phases: true,
        }
    }
}

impl SynthesisOptions {
    /// Set the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: Option<f64>) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Enable or disable phase collapsing.
    #[must_use]
    pub fn with_collapse_phases(mut self, collapse: bool) -> Self {
        self.collapse_phases = collapse;
        self
    }
}

/// Map an angle into [0, 2π).
pub fn normalize_angle(theta: f64) -> f64 {
    theta.rem_euclid(TAU)
}

/// Merge runs of S gates into Z gates.
///
/// Both rewrites are left-to-right and non-overlapping, `SSS` first.
pub fn collapse_phases(word: &str) -> String {
    word.replace("SSS", "SZ").replace("SS", "Z")
}

/// A decoded oracle answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateSequence {
    word: String,
    gates: Vec<StandardGate>,
}

impl GateSequence {
    /// Decode an oracle word.
    ///
    /// The word is an operator product, so it is read right to left to obtain
    /// circuit order. An empty word is the identity.
    pub fn parse(word: &str) -> CompileResult<Self> {
        let word = match word.trim() {
            "" => "I",
            w => w,
        };

        let mut gates = Vec::with_capacity(word.len());
        for symbol in word.chars().rev() {
            let gate = match symbol {
                'H' => StandardGate::H,
                'S' => StandardGate::S,
                'T' => StandardGate::T,
                'X' => StandardGate::X,
                'Z' => StandardGate::Z,
                'I' => continue,
                other => {
                    return Err(CompileError::OracleDecode {
                        symbol: other,
                        output: word.to_string(),
                    });
                }
            };
            gates.push(gate);
        }

        Ok(Self {
            word: word.to_string(),
            gates,
        })
    }

    /// The (possibly collapsed) oracle word.
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Gates in circuit order.
    pub fn gates(&self) -> &[StandardGate] {
        &self.gates
    }

    /// Number of gates.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Whether the sequence is the identity.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Number of T gates.
    pub fn t_count(&self) -> usize {
        self.gates.iter().filter(|g| g.is_t_like()).count()
    }

    /// Operator implemented by the sequence.
    pub fn unitary(&self) -> Unitary2x2 {
        Unitary2x2::from_sequence(&self.gates).unwrap_or_default()
    }

    /// Distance to `Rz(theta)`, ignoring global phase.
    pub fn error_for(&self, theta: f64) -> f64 {
        self.unitary().distance(&Unitary2x2::rz(theta))
    }
}

/// Synthesize `Rz(theta)` into a Clifford+T sequence.
pub fn synthesize_rz(
    oracle: &dyn RotationOracle,
    theta: f64,
    options: &SynthesisOptions,
) -> CompileResult<GateSequence> {
    if !theta.is_finite() {
        return Err(CompileError::OracleFailed(format!(
            "cannot synthesize non-finite angle {theta}"
        )));
    }
    let raw = oracle.synthesize(normalize_angle(theta), options.tolerance, options.seed)?;
    let word = if options.collapse_phases {
        collapse_phases(&raw)
    } else {
        raw
    };
    GateSequence::parse(&word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[derive(Debug)]
    struct FixedOracle(&'static str);

    impl RotationOracle for FixedOracle {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn synthesize(&self, _: f64, _: Option<f64>, _: Option<u64>) -> CompileResult<String> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(-PI / 2.0) - 3.0 * PI / 2.0).abs() < 1e-12);
        assert!((normalize_angle(5.0 * PI) - PI).abs() < 1e-12);
        assert_eq!(normalize_angle(0.25), 0.25);
        assert_eq!(normalize_angle(2.0 * PI), 0.0);
    }

    #[test]
    fn test_collapse_phases() {
        assert_eq!(collapse_phases("SSS"), "SZ");
        assert_eq!(collapse_phases("SS"), "Z");
        assert_eq!(collapse_phases("HSSSSH"), "HSZSH");
        assert_eq!(collapse_phases("SSSSS"), "SZZ");
        assert_eq!(collapse_phases("HTSHT"), "HTSHT");
    }

    #[test]
    fn test_parse_reads_right_to_left() {
        let seq = GateSequence::parse("HTS").unwrap();
        assert_eq!(
            seq.gates(),
            &[StandardGate::S, StandardGate::T, StandardGate::H]
        );
        assert_eq!(seq.t_count(), 1);
    }

    #[test]
    fn test_parse_identity() {
        assert!(GateSequence::parse("").unwrap().is_empty());
        assert_eq!(GateSequence::parse("").unwrap().word(), "I");
        assert!(GateSequence::parse("I").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_unknown_symbol() {
        match GateSequence::parse("HTWS") {
            Err(CompileError::OracleDecode { symbol, output }) => {
                assert_eq!(symbol, 'W');
                assert_eq!(output, "HTWS");
            }
            other => panic!("expected OracleDecode, got {other:?}"),
        }
    }

    #[test]
    fn test_exact_sequences_have_zero_error() {
        // T = Rz(π/4) up to phase; Z = Rz(π).
        assert!(GateSequence::parse("T").unwrap().error_for(PI / 4.0) < 1e-9);
        assert!(GateSequence::parse("Z").unwrap().error_for(PI) < 1e-9);
        assert!(GateSequence::parse("SSS").unwrap().error_for(-PI / 2.0) < 1e-9);
    }

    #[test]
    fn test_synthesize_collapses_before_decoding() {
        let seq = synthesize_rz(&FixedOracle("SSST"), 1.0, &SynthesisOptions::default()).unwrap();
        assert_eq!(seq.word(), "SZT");

        let raw = SynthesisOptions::default().with_collapse_phases(false);
        let seq = synthesize_rz(&FixedOracle("SSST"), 1.0, &raw).unwrap();
        assert_eq!(seq.word(), "SSST");
        assert_eq!(seq.len(), 4);
    }

    #[test]
    fn test_synthesize_rejects_nan() {
        assert!(synthesize_rz(&FixedOracle("T"), f64::NAN, &SynthesisOptions::default()).is_err());
    }
}
