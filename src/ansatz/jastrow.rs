//! Pairwise-coupling Jastrow ansatz.
//!
//! log ψ(σ) = Σᵢ aᵢ σᵢ + Σᵢⱼ σᵢ Wᵢⱼ σⱼ
//!
//! with a dense complex coupling matrix W over all site pairs.

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{random_matrix, random_vector, to_complex};
use crate::wavefunction::{LogWavefunction, VariationalWavefunction};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Jastrow {
    bias: DVector<Complex64>,
    kernel: DMatrix<Complex64>,
}

impl Jastrow {
    pub fn random<R: Rng + ?Sized>(n_sites: usize, rng: &mut R) -> Self {
        Self {
            bias: random_vector(n_sites, rng),
            kernel: random_matrix(n_sites, n_sites, rng),
        }
    }

    /// The dense pairwise coupling matrix; always square with side `n_sites`.
    pub fn kernel(&self) -> &DMatrix<Complex64> {
        &self.kernel
    }

    pub fn bias(&self) -> &DVector<Complex64> {
        &self.bias
    }
}

impl LogWavefunction for Jastrow {
    fn n_sites(&self) -> usize {
        self.bias.len()
    }

    fn log_psi(&self, sigma: &DVector<f64>) -> Complex64 {
        let s = to_complex(sigma);
        self.bias.dot(&s) + s.dot(&(&self.kernel * &s))
    }
}

impl VariationalWavefunction for Jastrow {
    fn num_params(&self) -> usize {
        let n = self.n_sites();
        n + n * n
    }

    fn params(&self) -> DVector<Complex64> {
        DVector::from_iterator(
            self.num_params(),
            self.bias.iter().chain(self.kernel.iter()).copied(),
        )
    }

    fn set_params(&mut self, params: &DVector<Complex64>) {
        let n = self.n_sites();
        assert_eq!(params.len(), self.num_params());
        self.bias = DVector::from_iterator(n, params.iter().take(n).copied());
        self.kernel = DMatrix::from_iterator(n, n, params.iter().skip(n).copied());
    }

    fn log_derivatives(&self, sigma: &DVector<f64>) -> DVector<Complex64> {
        let s = to_complex(sigma);
        let pairs = &s * s.transpose();
        DVector::from_iterator(
            self.num_params(),
            s.iter().chain(pairs.iter()).copied(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_kernel_is_square() {
        let mut rng = StdRng::seed_from_u64(3);
        let wfn = Jastrow::random(10, &mut rng);
        assert_eq!(wfn.kernel().nrows(), 10);
        assert_eq!(wfn.kernel().ncols(), 10);
    }

    #[test]
    fn test_param_round_trip() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut wfn = Jastrow::random(6, &mut rng);
        let params = wfn.params();
        assert_eq!(params.len(), 6 + 36);
        wfn.set_params(&params);
        assert_eq!(wfn.params(), params);
    }

    #[test]
    fn test_batch_length_matches_input() {
        let mut rng = StdRng::seed_from_u64(9);
        let wfn = Jastrow::random(8, &mut rng);
        let sector = crate::hilbert::SpinHalfSector::zero_magnetization(8).unwrap();
        let batch: Vec<_> = (0..17).map(|_| sector.random_config(&mut rng)).collect();
        assert_eq!(wfn.log_psi_batch(&batch).len(), 17);
    }
}
