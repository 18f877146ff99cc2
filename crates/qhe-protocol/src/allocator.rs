//! Bell-pair and transcript allocation for the T gadget.

use serde::{Deserialize, Serialize};
use tracing::debug;

use qhe_ir::{Circuit, ClbitId, IrError, IrResult, QubitId};

use crate::classical::ScratchPair;

/// Name of the single Bell-pair register under [`AncillaPolicy::Shared`].
pub const BELL_REGISTER: &str = "bell";
/// Scratch register for classical key updates under [`AncillaPolicy::Fresh`].
pub const SCRATCH_REGISTER: &str = "cl_anc";
/// First transcript bit of each gadget (measured from the pair's second qubit).
pub const RA_REGISTER: &str = "ra";
/// Second transcript bit of each gadget (measured from the pair's first qubit).
pub const RB_REGISTER: &str = "rb";

/// How Bell pairs are provisioned for T gadgets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AncillaPolicy {
    /// A fresh `bell_{k}` pair per T/T† occurrence.
    ///
    /// All server work runs first and every correction is deferred until
    /// after the final measurement. Key updates use a dedicated `cl_anc` pair.
    Fresh,
    /// One `bell` pair, reset before each occurrence.
    ///
    /// Corrections follow each gate immediately and the pair doubles as the
    /// classical scratch space.
    #[default]
    Shared,
}

impl AncillaPolicy {
    /// Parse `fresh` or `shared`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fresh" => Some(Self::Fresh),
            "shared" => Some(Self::Shared),
            _ => None,
        }
    }
}

impl std::fmt::Display for AncillaPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fresh => write!(f, "fresh"),
            Self::Shared => write!(f, "shared"),
        }
    }
}

/// Qubits and transcript bits reserved for every T gadget of one build.
#[derive(Debug, Clone)]
pub struct BellAllocation {
    policy: AncillaPolicy,
    pairs: Vec<ScratchPair>,
    scratch: ScratchPair,
    ra: Vec<ClbitId>,
    rb: Vec<ClbitId>,
}

impl BellAllocation {
    /// Policy the allocation was made under.
    pub fn policy(&self) -> AncillaPolicy {
        self.policy
    }

    /// Number of gadget slots, equal to the T/T† count.
    pub fn slots(&self) -> usize {
        self.ra.len()
    }

    /// Number of Bell-pair registers declared.
    pub fn registers(&self) -> usize {
        self.pairs.len()
    }

    /// Pair serving gadget `slot`.
    pub fn pair(&self, slot: usize) -> IrResult<ScratchPair> {
        let index = match self.policy {
            AncillaPolicy::Fresh => slot,
            AncillaPolicy::Shared => 0,
        };
        self.pairs
            .get(index)
            .copied()
            .ok_or_else(|| IrError::IndexOutOfRange {
                register: BELL_REGISTER.into(),
                index: slot as u32,
                size: self.pairs.len() as u32,
            })
    }

    /// `(ra, rb)` transcript bits of gadget `slot`.
    pub fn transcript(&self, slot: usize) -> IrResult<(ClbitId, ClbitId)> {
        match (self.ra.get(slot), self.rb.get(slot)) {
            (Some(&ra), Some(&rb)) => Ok((ra, rb)),
            _ => Err(IrError::IndexOutOfRange {
                register: RA_REGISTER.into(),
                index: slot as u32,
                size: self.ra.len() as u32,
            }),
        }
    }

    /// Scratch pair for classical key updates.
    pub fn scratch(&self) -> ScratchPair {
        self.scratch
    }

    /// Whether a pair must be reset before it is entangled.
    pub fn resets_pairs(&self) -> bool {
        self.policy == AncillaPolicy::Shared
    }

    /// Whether gadget corrections run right after their server part.
    pub fn interleaves_corrections(&self) -> bool {
        self.policy == AncillaPolicy::Shared
    }
}

/// Declares Bell-pair, scratch and transcript registers on a circuit.
#[derive(Debug, Clone, Copy, Default)]
pub struct AncillaArena {
    policy: AncillaPolicy,
}

impl AncillaArena {
    /// Create an arena for the given policy.
    pub fn new(policy: AncillaPolicy) -> Self {
        Self { policy }
    }

    /// Reserve room for `t_count` gadgets.
    ///
    /// Quantum registers are declared first (`bell_0..` plus `cl_anc`, or the
    /// single `bell`), then `ra` and `rb` when `t_count` is non-zero.
    pub fn allocate(&self, circuit: &mut Circuit, t_count: usize) -> IrResult<BellAllocation> {
        let (pairs, scratch) = match self.policy {
            AncillaPolicy::Fresh => {
                let mut pairs = Vec::with_capacity(t_count);
                for k in 0..t_count {
                    pairs.push(pair_of(&circuit.add_qreg(format!("bell_{k}"), 2)?));
                }
                let scratch = pair_of(&circuit.add_qreg(SCRATCH_REGISTER, 2)?);
                (pairs, scratch)
            }
            AncillaPolicy::Shared => {
                let bell = pair_of(&circuit.add_qreg(BELL_REGISTER, 2)?);
                (vec![bell], bell)
            }
        };

        let (ra, rb) = if t_count > 0 {
            (
                circuit.add_creg(RA_REGISTER, t_count as u32)?,
                circuit.add_creg(RB_REGISTER, t_count as u32)?,
            )
        } else {
            (vec![], vec![])
        };

        debug!(
            "allocated {} bell register(s) for {t_count} gadget(s) under {} policy",
            pairs.len(),
            self.policy
        );

        Ok(BellAllocation {
            policy: self.policy,
            pairs,
            scratch,
            ra,
            rb,
        })
    }
}

fn pair_of(qubits: &[QubitId]) -> ScratchPair {
    ScratchPair::new(qubits[0], qubits[1])
}
