//! Spin VMC - variational Monte Carlo for the spin-1/2 Heisenberg chain.
//!
//! This crate trains neural-network wave-function ansätze (Jastrow,
//! restricted Boltzmann machines, feed-forward networks) by stochastic
//! reconfiguration over a fixed-magnetization sector, and checks them
//! against a sparse Lanczos exact diagonalization of the same Hamiltonian.

pub mod ansatz;
pub mod error;
pub mod exact;
pub mod hamiltonian;
pub mod hilbert;
pub mod io;
pub mod lattice;
pub mod report;
pub mod sampling;
pub mod wavefunction;

// Re-export commonly used types at crate root
pub use ansatz::{FeedForward, Jastrow, Rbm, SymmetricRbm};
pub use error::VmcError;
pub use exact::{ground_state_energy, LanczosOptions, SparseHamiltonian};
pub use hamiltonian::Heisenberg;
pub use hilbert::SpinHalfSector;
pub use io::{read_config, EnergySeries, RunConfig, RunLog};
pub use lattice::Chain;
pub use sampling::{ExchangeSampler, SrOptimizer};
pub use wavefunction::{LogWavefunction, VariationalWavefunction};

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::DVector;
    use num_complex::Complex64;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::ansatz::{FeedForward, Jastrow, Rbm, SymmetricRbm};
    use crate::exact::SparseHamiltonian;
    use crate::hamiltonian::Heisenberg;
    use crate::hilbert::SpinHalfSector;
    use crate::lattice::Chain;
    use crate::wavefunction::{LogWavefunction, VariationalWavefunction};

    const N: usize = 6;

    fn check_log_derivatives<W: VariationalWavefunction>(wfn: &mut W, seed: u64) {
        let sector = SpinHalfSector::zero_magnetization(wfn.n_sites()).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let sigma = sector.random_config(&mut rng);

        let analytical = wfn.log_derivatives(&sigma);
        let numerical = wfn.numerical_log_derivatives(&sigma, 1e-5);

        assert_eq!(analytical.len(), wfn.num_params());
        for k in 0..analytical.len() {
            assert_relative_eq!(analytical[k].re, numerical[k].re, epsilon = 1e-6);
            assert_relative_eq!(analytical[k].im, numerical[k].im, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_jastrow_numerical_log_derivatives() {
        let mut rng = StdRng::seed_from_u64(101);
        let mut wfn = Jastrow::random(N, &mut rng);
        check_log_derivatives(&mut wfn, 1);
    }

    #[test]
    fn test_rbm_numerical_log_derivatives() {
        let mut rng = StdRng::seed_from_u64(102);
        let mut wfn = Rbm::random(N, 2, &mut rng);
        check_log_derivatives(&mut wfn, 2);
    }

    #[test]
    fn test_symmetric_rbm_numerical_log_derivatives() {
        let mut rng = StdRng::seed_from_u64(103);
        let mut wfn = SymmetricRbm::random(N, 2, &mut rng);
        check_log_derivatives(&mut wfn, 3);
    }

    #[test]
    fn test_feedforward_numerical_log_derivatives() {
        let mut rng = StdRng::seed_from_u64(104);
        let mut wfn = FeedForward::single(N, 2, &mut rng);
        check_log_derivatives(&mut wfn, 4);
    }

    #[test]
    fn test_deep_feedforward_numerical_log_derivatives() {
        let mut rng = StdRng::seed_from_u64(105);
        let mut wfn = FeedForward::two_layer(N, 2, 1, &mut rng);
        check_log_derivatives(&mut wfn, 5);
    }

    #[test]
    fn test_batch_evaluation_is_elementwise() {
        let mut rng = StdRng::seed_from_u64(106);
        let wfn = Rbm::random(N, 1, &mut rng);
        let sector = SpinHalfSector::zero_magnetization(N).unwrap();
        let batch: Vec<DVector<f64>> =
            (0..12).map(|_| sector.random_config(&mut rng)).collect();
        let values = wfn.log_psi_batch(&batch);
        assert_eq!(values.len(), batch.len());
        for (sigma, &value) in batch.iter().zip(values.iter()) {
            assert_eq!(wfn.log_psi(sigma), value);
        }
    }

    /// ⟨H⟩ assembled from local energies over the whole sector must equal
    /// the Rayleigh quotient of the dense sector Hamiltonian.
    #[test]
    fn test_local_energy_consistent_with_dense_operator() {
        let chain = Chain::new(N, true);
        let ham = Heisenberg::new(&chain, 1.0);
        let sector = SpinHalfSector::zero_magnetization(N).unwrap();
        let mut rng = StdRng::seed_from_u64(107);
        let wfn = Jastrow::random(N, &mut rng);

        let states = sector.states();
        let psi: Vec<Complex64> = states
            .iter()
            .map(|&bits| wfn.log_psi(&sector.bits_to_config(bits)).exp())
            .collect();

        // local-energy estimate with exact Born weights
        let mut weighted = Complex64::new(0.0, 0.0);
        let mut weight_sum = 0.0;
        for (k, &bits) in states.iter().enumerate() {
            let weight = psi[k].norm_sqr();
            weighted += weight * ham.local_energy(&wfn, &sector.bits_to_config(bits));
            weight_sum += weight;
        }
        let from_local = weighted / weight_sum;

        // dense Rayleigh quotient
        let dense = SparseHamiltonian::build(&ham, &sector).to_dense();
        let mut numerator = Complex64::new(0.0, 0.0);
        for r in 0..states.len() {
            for c in 0..states.len() {
                numerator += psi[r].conj() * dense[(r, c)] * psi[c];
            }
        }
        let quotient = numerator / weight_sum;

        assert_relative_eq!(from_local.re, quotient.re, epsilon = 1e-8);
        assert_relative_eq!(from_local.im, quotient.im, epsilon = 1e-8);
    }
}
