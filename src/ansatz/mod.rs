//! Variational wave-function ansätze for the spin chain.
//!
//! Every ansatz maps a ±1 configuration to a complex log-amplitude and is
//! holomorphic in its complex parameters.

mod feedforward;
mod jastrow;
mod rbm;

pub use feedforward::FeedForward;
pub use jastrow::Jastrow;
pub use rbm::{Rbm, SymmetricRbm};

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Standard deviation for random parameter initialization.
pub(crate) const INIT_SIGMA: f64 = 0.01;

/// Numerically stable log(cosh(z)) for complex argument.
///
/// Uses log cosh z = |Re z|-dominant form z + log((1 + e^{−2z})/2) with the
/// sign folded out, so the exponential never overflows.
pub(crate) fn ln_cosh(z: Complex64) -> Complex64 {
    let s = if z.re < 0.0 { -z } else { z };
    s + ((-2.0 * s).exp() + 1.0).ln() - std::f64::consts::LN_2
}

pub(crate) fn random_vector<R: Rng + ?Sized>(n: usize, rng: &mut R) -> DVector<Complex64> {
    let dist = Normal::new(0.0, INIT_SIGMA).unwrap();
    DVector::from_fn(n, |_, _| Complex64::new(dist.sample(rng), dist.sample(rng)))
}

pub(crate) fn random_matrix<R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    rng: &mut R,
) -> DMatrix<Complex64> {
    let dist = Normal::new(0.0, INIT_SIGMA).unwrap();
    DMatrix::from_fn(rows, cols, |_, _| {
        Complex64::new(dist.sample(rng), dist.sample(rng))
    })
}

/// Promote a ±1 configuration to a complex vector.
pub(crate) fn to_complex(sigma: &DVector<f64>) -> DVector<Complex64> {
    sigma.map(|s| Complex64::new(s, 0.0))
}
