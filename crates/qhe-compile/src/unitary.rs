//! 2x2 unitary utilities.
//!
//! Used to measure how far a synthesized Clifford+T sequence is from the
//! rotation it replaces, and to check single-qubit rewrite identities.

use num_complex::Complex64;
use std::f64::consts::PI;

use qhe_ir::StandardGate;

/// Tolerance for floating point comparisons.
const EPSILON: f64 = 1e-10;

/// A 2x2 unitary matrix in row-major order.
#[derive(Debug, Clone, Copy)]
pub struct Unitary2x2 {
    /// The matrix elements in row-major order: [[a, b], [c, d]].
    pub data: [Complex64; 4],
}

impl Unitary2x2 {
    /// Create a new 2x2 unitary matrix.
    pub fn new(a: Complex64, b: Complex64, c: Complex64, d: Complex64) -> Self {
        Self { data: [a, b, c, d] }
    }

    fn diag(a: Complex64, d: Complex64) -> Self {
        Self::new(a, Complex64::new(0.0, 0.0), Complex64::new(0.0, 0.0), d)
    }

    /// Create the identity matrix.
    pub fn identity() -> Self {
        Self::diag(Complex64::new(1.0, 0.0), Complex64::new(1.0, 0.0))
    }

    /// Create a Hadamard matrix.
    pub fn h() -> Self {
        let s = 1.0 / 2.0_f64.sqrt();
        Self::new(
            Complex64::new(s, 0.0),
            Complex64::new(s, 0.0),
            Complex64::new(s, 0.0),
            Complex64::new(-s, 0.0),
        )
    }

    /// Create a Pauli-X matrix.
    pub fn x() -> Self {
        Self::new(
            Complex64::new(0.0, 0.0),
            Complex64::new(1.0, 0.0),
            Complex64::new(1.0, 0.0),
            Complex64::new(0.0, 0.0),
        )
    }

    /// Create a Pauli-Y matrix.
    pub fn y() -> Self {
        Self::new(
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, -1.0),
            Complex64::new(0.0, 1.0),
            Complex64::new(0.0, 0.0),
        )
    }

    /// Create a Pauli-Z matrix.
    pub fn z() -> Self {
        Self::p(PI)
    }

    /// Create an S gate (sqrt(Z)).
    pub fn s() -> Self {
        Self::diag(Complex64::new(1.0, 0.0), Complex64::new(0.0, 1.0))
    }

    /// Create an S-dagger gate.
    pub fn sdg() -> Self {
        Self::diag(Complex64::new(1.0, 0.0), Complex64::new(0.0, -1.0))
    }

    /// Create a T gate (fourth root of Z).
    pub fn t() -> Self {
        Self::p(PI / 4.0)
    }

    /// Create a T-dagger gate.
    pub fn tdg() -> Self {
        Self::p(-PI / 4.0)
    }

    /// Create an RX rotation matrix.
    pub fn rx(theta: f64) -> Self {
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        Self::new(
            Complex64::new(c, 0.0),
            Complex64::new(0.0, -s),
            Complex64::new(0.0, -s),
            Complex64::new(c, 0.0),
        )
    }

    /// Create an RY rotation matrix.
    pub fn ry(theta: f64) -> Self {
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        Self::new(
            Complex64::new(c, 0.0),
            Complex64::new(-s, 0.0),
            Complex64::new(s, 0.0),
            Complex64::new(c, 0.0),
        )
    }

    /// Create an RZ rotation matrix.
    pub fn rz(theta: f64) -> Self {
        Self::diag(
            Complex64::from_polar(1.0, -theta / 2.0),
            Complex64::from_polar(1.0, theta / 2.0),
        )
    }

    /// Create a phase gate P(lambda).
    pub fn p(lambda: f64) -> Self {
        Self::diag(Complex64::new(1.0, 0.0), Complex64::from_polar(1.0, lambda))
    }

    /// Create a U gate U(theta, phi, lambda).
    pub fn u(theta: f64, phi: f64, lambda: f64) -> Self {
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        Self::new(
            Complex64::new(c, 0.0),
            -Complex64::from_polar(s, lambda),
            Complex64::from_polar(s, phi),
            Complex64::from_polar(c, phi + lambda),
        )
    }

    /// Matrix of a single-qubit standard gate.
    pub fn from_gate(gate: &StandardGate) -> Option<Self> {
        Some(match gate {
            StandardGate::X => Self::x(),
            StandardGate::Y => Self::y(),
            StandardGate::Z => Self::z(),
            StandardGate::H => Self::h(),
            StandardGate::S => Self::s(),
            StandardGate::Sdg => Self::sdg(),
            StandardGate::T => Self::t(),
            StandardGate::Tdg => Self::tdg(),
            StandardGate::Rx(t) => Self::rx(*t),
            StandardGate::Ry(t) => Self::ry(*t),
            StandardGate::Rz(t) => Self::rz(*t),
            StandardGate::P(t) => Self::p(*t),
            StandardGate::U(t, p, l) => Self::u(*t, *p, *l),
            _ => return None,
        })
    }

    /// Operator of a gate sequence given in circuit order.
    ///
    /// Returns `None` if any gate is not single-qubit.
    pub fn from_sequence<'a>(gates: impl IntoIterator<Item = &'a StandardGate>) -> Option<Self> {
        gates
            .into_iter()
            .try_fold(Self::identity(), |acc, g| Some(Self::from_gate(g)?.mul(&acc)))
    }

    /// Multiply this matrix by another: self * other.
    #[allow(clippy::many_single_char_names)]
    pub fn mul(&self, other: &Self) -> Self {
        let [a, b, c, d] = self.data;
        let [e, f, g, h] = other.data;
        Self::new(a * e + b * g, a * f + b * h, c * e + d * g, c * f + d * h)
    }

    /// Get the conjugate transpose (dagger).
    pub fn dagger(&self) -> Self {
        Self::new(
            self.data[0].conj(),
            self.data[2].conj(),
            self.data[1].conj(),
            self.data[3].conj(),
        )
    }

    /// Check if this is approximately identity (up to global phase).
    pub fn is_identity(&self) -> bool {
        let [a, b, c, d] = self.data;
        if b.norm() > EPSILON || c.norm() > EPSILON {
            return false;
        }
        (a - d).norm() < EPSILON
    }

    /// Phase-insensitive distance `sqrt(1 - |tr(U†V)|/2)`.
    ///
    /// Zero exactly when the two unitaries agree up to a global phase.
    pub fn distance(&self, other: &Self) -> f64 {
        let m = self.dagger().mul(other);
        let overlap = ((m.data[0] + m.data[3]).norm() / 2.0).min(1.0);
        (1.0 - overlap).max(0.0).sqrt()
    }

    /// Whether two unitaries agree up to a global phase.
    pub fn approx_eq_up_to_phase(&self, other: &Self, tol: f64) -> bool {
        self.distance(other) < tol
    }
}

impl Default for Unitary2x2 {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for Unitary2x2 {
    type Output = Self;

    #[allow(clippy::needless_pass_by_value)]
    fn mul(self, rhs: Self) -> Self::Output {
        Unitary2x2::mul(&self, &rhs)
    }
}
