//! Restricted-Boltzmann wave functions, unsymmetrized and
//! translation-projected.

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use rand::Rng;

use super::{ln_cosh, random_matrix, random_vector, to_complex};
use crate::wavefunction::{LogWavefunction, VariationalWavefunction};

/// Restricted Boltzmann machine:
///
///   log ψ(σ) = Σᵢ aᵢ σᵢ + Σⱼ log cosh(bⱼ + Σᵢ Wⱼᵢ σᵢ)
///
/// with `alpha · n_sites` hidden units.
#[derive(Debug, Clone)]
pub struct Rbm {
    visible_bias: DVector<Complex64>,
    hidden_bias: DVector<Complex64>,
    weights: DMatrix<Complex64>,
}

impl Rbm {
    pub fn random<R: Rng + ?Sized>(n_sites: usize, alpha: usize, rng: &mut R) -> Self {
        assert!(alpha >= 1, "hidden-unit density must be at least 1");
        let n_hidden = alpha * n_sites;
        Self {
            visible_bias: random_vector(n_sites, rng),
            hidden_bias: random_vector(n_hidden, rng),
            weights: random_matrix(n_hidden, n_sites, rng),
        }
    }

    pub fn n_hidden(&self) -> usize {
        self.hidden_bias.len()
    }

    fn hidden_activations(&self, s: &DVector<Complex64>) -> DVector<Complex64> {
        &self.hidden_bias + &self.weights * s
    }
}

impl LogWavefunction for Rbm {
    fn n_sites(&self) -> usize {
        self.visible_bias.len()
    }

    fn log_psi(&self, sigma: &DVector<f64>) -> Complex64 {
        let s = to_complex(sigma);
        let theta = self.hidden_activations(&s);
        self.visible_bias.dot(&s) + theta.iter().map(|&t| ln_cosh(t)).sum::<Complex64>()
    }
}

impl VariationalWavefunction for Rbm {
    fn num_params(&self) -> usize {
        self.visible_bias.len() + self.hidden_bias.len() + self.weights.len()
    }

    fn params(&self) -> DVector<Complex64> {
        DVector::from_iterator(
            self.num_params(),
            self.visible_bias
                .iter()
                .chain(self.hidden_bias.iter())
                .chain(self.weights.iter())
                .copied(),
        )
    }

    fn set_params(&mut self, params: &DVector<Complex64>) {
        assert_eq!(params.len(), self.num_params());
        let n = self.visible_bias.len();
        let m = self.hidden_bias.len();
        let slice = params.as_slice();
        self.visible_bias = DVector::from_column_slice(&slice[..n]);
        self.hidden_bias = DVector::from_column_slice(&slice[n..n + m]);
        self.weights = DMatrix::from_column_slice(m, n, &slice[n + m..]);
    }

    fn log_derivatives(&self, sigma: &DVector<f64>) -> DVector<Complex64> {
        let s = to_complex(sigma);
        let tanh_theta = self.hidden_activations(&s).map(|t| t.tanh());
        let weight_grads = &tanh_theta * s.transpose();
        DVector::from_iterator(
            self.num_params(),
            s.iter()
                .chain(tanh_theta.iter())
                .chain(weight_grads.iter())
                .copied(),
        )
    }
}

/// Translation-projected RBM.
///
/// One filter row and one hidden bias per feature are shared across all
/// cyclic translates of the chain:
///
///   log ψ(σ) = a Σᵢ σᵢ + Σ_f Σ_t log cosh(b_f + Σᵢ w_f[(i − t) mod N] σᵢ)
///
/// Parameter count is α(N + 1) + 1, far below the unsymmetrized RBM's
/// αN² + αN + N, and the log-amplitude is invariant under cyclic
/// translation of the configuration.
#[derive(Debug, Clone)]
pub struct SymmetricRbm {
    visible_bias: Complex64,
    hidden_bias: DVector<Complex64>,
    filters: DMatrix<Complex64>,
}

impl SymmetricRbm {
    pub fn random<R: Rng + ?Sized>(n_sites: usize, alpha: usize, rng: &mut R) -> Self {
        assert!(alpha >= 1, "feature density must be at least 1");
        Self {
            visible_bias: random_vector(1, rng)[0],
            hidden_bias: random_vector(alpha, rng),
            filters: random_matrix(alpha, n_sites, rng),
        }
    }

    pub fn n_features(&self) -> usize {
        self.hidden_bias.len()
    }

    /// θ_{f,t} = b_f + Σᵢ w_f[(i − t) mod N] σᵢ for every feature f and
    /// translate t.
    fn activations(&self, sigma: &DVector<f64>) -> DMatrix<Complex64> {
        let n = self.n_sites();
        DMatrix::from_fn(self.n_features(), n, |f, t| {
            let mut acc = self.hidden_bias[f];
            for i in 0..n {
                acc += self.filters[(f, (i + n - t) % n)] * sigma[i];
            }
            acc
        })
    }
}

impl LogWavefunction for SymmetricRbm {
    fn n_sites(&self) -> usize {
        self.filters.ncols()
    }

    fn log_psi(&self, sigma: &DVector<f64>) -> Complex64 {
        let total: f64 = sigma.sum();
        self.visible_bias * total
            + self
                .activations(sigma)
                .iter()
                .map(|&t| ln_cosh(t))
                .sum::<Complex64>()
    }
}

impl VariationalWavefunction for SymmetricRbm {
    fn num_params(&self) -> usize {
        1 + self.hidden_bias.len() + self.filters.len()
    }

    fn params(&self) -> DVector<Complex64> {
        DVector::from_iterator(
            self.num_params(),
            std::iter::once(&self.visible_bias)
                .chain(self.hidden_bias.iter())
                .chain(self.filters.iter())
                .copied(),
        )
    }

    fn set_params(&mut self, params: &DVector<Complex64>) {
        assert_eq!(params.len(), self.num_params());
        let alpha = self.hidden_bias.len();
        let n = self.filters.ncols();
        let slice = params.as_slice();
        self.visible_bias = slice[0];
        self.hidden_bias = DVector::from_column_slice(&slice[1..1 + alpha]);
        self.filters = DMatrix::from_column_slice(alpha, n, &slice[1 + alpha..]);
    }

    fn log_derivatives(&self, sigma: &DVector<f64>) -> DVector<Complex64> {
        let n = self.n_sites();
        let alpha = self.n_features();
        let tanh_theta = self.activations(sigma).map(|t| t.tanh());

        let mut derivs = DVector::zeros(self.num_params());
        derivs[0] = Complex64::new(sigma.sum(), 0.0);
        for f in 0..alpha {
            derivs[1 + f] = tanh_theta.row(f).sum();
        }
        // filter entry (f, d) feeds site (d + t) mod N of translate t
        for d in 0..n {
            for f in 0..alpha {
                let mut acc = Complex64::new(0.0, 0.0);
                for t in 0..n {
                    acc += tanh_theta[(f, t)] * sigma[(d + t) % n];
                }
                derivs[1 + alpha + d * alpha + f] = acc;
            }
        }
        derivs
    }
}
