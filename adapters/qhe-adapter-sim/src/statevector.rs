//! Statevector simulation engine.
//!
//! Qubit `k` is bit `k` of the amplitude index. Measurement and reset are
//! projective and take the uniform sample from the caller, so a seeded
//! RNG gives reproducible shots.

use std::f64::consts::{FRAC_1_SQRT_2, PI};

use num_complex::Complex64;

use qhe_ir::StandardGate;

type Matrix2 = [[Complex64; 2]; 2];

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

fn diag(a: Complex64, b: Complex64) -> Matrix2 {
    [[a, ZERO], [ZERO, b]]
}

fn phase(theta: f64) -> Matrix2 {
    diag(ONE, Complex64::from_polar(1.0, theta))
}

fn rx(theta: f64) -> Matrix2 {
    let c = Complex64::new((theta / 2.0).cos(), 0.0);
    let s = Complex64::new(0.0, -(theta / 2.0).sin());
    [[c, s], [s, c]]
}

fn ry(theta: f64) -> Matrix2 {
    let c = Complex64::new((theta / 2.0).cos(), 0.0);
    let s = Complex64::new((theta / 2.0).sin(), 0.0);
    [[c, -s], [s, c]]
}

fn rz(theta: f64) -> Matrix2 {
    diag(
        Complex64::from_polar(1.0, -theta / 2.0),
        Complex64::from_polar(1.0, theta / 2.0),
    )
}

fn u(theta: f64, phi: f64, lambda: f64) -> Matrix2 {
    let c = (theta / 2.0).cos();
    let s = (theta / 2.0).sin();
    [
        [ONE * c, -Complex64::from_polar(s, lambda)],
        [Complex64::from_polar(s, phi), Complex64::from_polar(c, phi + lambda)],
    ]
}

/// Matrix of a one-qubit gate.
fn single_qubit_matrix(gate: &StandardGate) -> Option<Matrix2> {
    let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
    Some(match gate {
        StandardGate::X => [[ZERO, ONE], [ONE, ZERO]],
        StandardGate::Y => [[ZERO, -I], [I, ZERO]],
        StandardGate::Z => diag(ONE, -ONE),
        StandardGate::H => [[h, h], [h, -h]],
        StandardGate::S => phase(PI / 2.0),
        StandardGate::Sdg => phase(-PI / 2.0),
        StandardGate::T => phase(PI / 4.0),
        StandardGate::Tdg => phase(-PI / 4.0),
        StandardGate::Rx(t) => rx(*t),
        StandardGate::Ry(t) => ry(*t),
        StandardGate::Rz(t) => rz(*t),
        StandardGate::P(t) => phase(*t),
        StandardGate::U(t, p, l) => u(*t, *p, *l),
        _ => return None,
    })
}

/// Number of leading control operands and the matrix applied to the target.
fn controlled_matrix(gate: &StandardGate) -> Option<(usize, Matrix2)> {
    let base = match gate {
        StandardGate::CX => (1, StandardGate::X),
        StandardGate::CY => (1, StandardGate::Y),
        StandardGate::CZ => (1, StandardGate::Z),
        StandardGate::CH => (1, StandardGate::H),
        StandardGate::CRx(t) => (1, StandardGate::Rx(*t)),
        StandardGate::CRy(t) => (1, StandardGate::Ry(*t)),
        StandardGate::CRz(t) => (1, StandardGate::Rz(*t)),
        StandardGate::CP(t) => (1, StandardGate::P(*t)),
        StandardGate::CCX => (2, StandardGate::X),
        StandardGate::Mcx { controls } => (*controls as usize, StandardGate::X),
        _ => return None,
    };
    single_qubit_matrix(&base.1).map(|m| (base.0, m))
}

/// A pure state over `num_qubits` qubits.
#[derive(Debug, Clone)]
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let mut amplitudes = vec![ZERO; 1 << num_qubits];
        amplitudes[0] = ONE;
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The amplitudes, indexed by basis state.
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Apply a standard gate to the given qubit indices.
    pub fn apply_gate(&mut self, gate: &StandardGate, qubits: &[usize]) {
        if let StandardGate::Swap = gate {
            self.apply_swap(qubits[0], qubits[1]);
        } else if let Some(m) = single_qubit_matrix(gate) {
            self.apply_matrix(0, qubits[0], &m);
        } else if let Some((k, m)) = controlled_matrix(gate) {
            let control_mask = qubits[..k].iter().fold(0, |mask, &q| mask | (1 << q));
            self.apply_matrix(control_mask, qubits[k], &m);
        }
    }

    /// Apply `m` to `target` on the subspace where every control bit is set.
    fn apply_matrix(&mut self, control_mask: usize, target: usize, m: &Matrix2) {
        let tgt_mask = 1 << target;
        for i in 0..self.amplitudes.len() {
            if i & tgt_mask == 0 && i & control_mask == control_mask {
                let j = i | tgt_mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = m[0][0] * a + m[0][1] * b;
                self.amplitudes[j] = m[1][0] * a + m[1][1] * b;
            }
        }
    }

    fn apply_swap(&mut self, q1: usize, q2: usize) {
        let mask1 = 1 << q1;
        let mask2 = 1 << q2;
        for i in 0..self.amplitudes.len() {
            if i & mask1 != 0 && i & mask2 == 0 {
                let j = (i & !mask1) | mask2;
                self.amplitudes.swap(i, j);
            }
        }
    }

    /// Probability of reading 1 on `qubit`.
    pub fn probability_one(&self, qubit: usize) -> f64 {
        let mask = 1 << qubit;
        self.amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask != 0)
            .map(|(_, a)| a.norm_sqr())
            .sum()
    }

    /// Measure `qubit` and collapse the state.
    ///
    /// `sample` is a uniform draw from [0, 1); the outcome is 1 when it falls
    /// below the probability of 1.
    pub fn measure(&mut self, qubit: usize, sample: f64) -> bool {
        let p1 = self.probability_one(qubit);
        let outcome = sample < p1;
        let kept = if outcome { p1 } else { 1.0 - p1 };

        let mask = 1 << qubit;
        let scale = if kept > 0.0 { 1.0 / kept.sqrt() } else { 0.0 };
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if (i & mask != 0) == outcome {
                *amp *= scale;
            } else {
                *amp = ZERO;
            }
        }
        outcome
    }

    /// Reset `qubit` to |0⟩: measure, then flip on 1.
    pub fn reset(&mut self, qubit: usize, sample: f64) {
        if self.measure(qubit, sample) {
            self.apply_gate(&StandardGate::X, &[qubit]);
        }
    }

    /// Sample every qubit at once without collapsing.
    pub fn sample(&self, sample: f64) -> usize {
        let mut cumulative = 0.0;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            cumulative += amp.norm_sqr();
            if sample < cumulative {
                return i;
            }
        }
        self.amplitudes.len() - 1
    }

    /// Overlap magnitude |⟨self|other⟩|, 1 when equal up to global phase.
    pub fn fidelity(&self, other: &Statevector) -> f64 {
        self.amplitudes
            .iter()
            .zip(&other.amplitudes)
            .map(|(a, b)| a.conj() * b)
            .sum::<Complex64>()
            .norm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(2);
        assert!(approx_eq(sv.amplitudes[0], ONE));
        assert!(sv.amplitudes[1..].iter().all(|&a| approx_eq(a, ZERO)));
    }

    #[test]
    fn test_bell_state() {
        let mut sv = Statevector::new(2);
        sv.apply_gate(&StandardGate::H, &[0]);
        sv.apply_gate(&StandardGate::CX, &[0, 1]);

        let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
        assert!(approx_eq(sv.amplitudes[0], h));
        assert!(approx_eq(sv.amplitudes[1], ZERO));
        assert!(approx_eq(sv.amplitudes[2], ZERO));
        assert!(approx_eq(sv.amplitudes[3], h));
    }

    #[test]
    fn test_mcx_needs_every_control() {
        let mcx = StandardGate::Mcx { controls: 3 };
        let mut sv = Statevector::new(4);
        sv.apply_gate(&StandardGate::X, &[0]);
        sv.apply_gate(&StandardGate::X, &[2]);
        sv.apply_gate(&mcx, &[0, 1, 2, 3]);
        assert!(approx_eq(sv.amplitudes[0b0101], ONE));

        sv.apply_gate(&StandardGate::X, &[1]);
        sv.apply_gate(&mcx, &[0, 1, 2, 3]);
        assert!(approx_eq(sv.amplitudes[0b1111], ONE));
    }

    #[test]
    fn test_swap() {
        let mut sv = Statevector::new(2);
        sv.apply_gate(&StandardGate::X, &[0]);
        sv.apply_gate(&StandardGate::Swap, &[0, 1]);
        assert!(approx_eq(sv.amplitudes[0b10], ONE));
    }

    #[test]
    fn test_measure_collapses() {
        let mut sv = Statevector::new(2);
        sv.apply_gate(&StandardGate::H, &[0]);
        sv.apply_gate(&StandardGate::CX, &[0, 1]);

        assert!((sv.probability_one(1) - 0.5).abs() < 1e-12);
        assert!(sv.measure(0, 0.1));
        assert!((sv.probability_one(1) - 1.0).abs() < 1e-12);
        assert!(approx_eq(sv.amplitudes[0b11], ONE));
    }

    #[test]
    fn test_reset_returns_to_zero() {
        let mut sv = Statevector::new(1);
        sv.apply_gate(&StandardGate::H, &[0]);
        sv.reset(0, 0.2);
        assert!(approx_eq(sv.amplitudes[0], ONE));

        let mut sv = Statevector::new(1);
        sv.apply_gate(&StandardGate::H, &[0]);
        sv.reset(0, 0.9);
        assert!(approx_eq(sv.amplitudes[0], ONE));
    }

    #[test]
    fn test_t_squared_is_s() {
        let mut a = Statevector::new(1);
        a.apply_gate(&StandardGate::H, &[0]);
        a.apply_gate(&StandardGate::T, &[0]);
        a.apply_gate(&StandardGate::T, &[0]);

        let mut b = Statevector::new(1);
        b.apply_gate(&StandardGate::H, &[0]);
        b.apply_gate(&StandardGate::S, &[0]);

        assert!((a.fidelity(&b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sample_deterministic() {
        let mut sv = Statevector::new(1);
        sv.apply_gate(&StandardGate::X, &[0]);
        for r in [0.0, 0.3, 0.999] {
            assert_eq!(sv.sample(r), 1);
        }
    }
}
