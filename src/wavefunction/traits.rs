//! Wave-function traits for spin-chain VMC.
//!
//! A wave function maps a spin configuration (length-N vector of ±1) to a
//! complex log-amplitude. Working in log space keeps amplitude ratios exact
//! for Metropolis acceptance and local-energy evaluation.

use nalgebra::DVector;
use num_complex::Complex64;

/// Configuration → complex log-amplitude mapping.
pub trait LogWavefunction {
    /// Number of sites the wave function is defined over.
    fn n_sites(&self) -> usize;

    /// Evaluate log ψ(σ) for a single configuration.
    fn log_psi(&self, sigma: &DVector<f64>) -> Complex64;

    /// Evaluate a batch of configurations, elementwise independent.
    /// The output length always equals the input length.
    fn log_psi_batch(&self, batch: &[DVector<f64>]) -> Vec<Complex64> {
        batch.iter().map(|sigma| self.log_psi(sigma)).collect()
    }
}

/// Trait for wave functions with optimizable variational parameters.
///
/// Provides the parameter log-derivatives O_k = ∂ log ψ(σ) / ∂ p_k needed by
/// stochastic reconfiguration. Parameters are complex and every ansatz here
/// is holomorphic in them.
pub trait VariationalWavefunction: LogWavefunction {
    /// Number of independent variational parameters.
    fn num_params(&self) -> usize;

    /// Current parameter values as a flat vector.
    fn params(&self) -> DVector<Complex64>;

    /// Set parameter values from a flat vector in the same order as
    /// [`params`](Self::params).
    fn set_params(&mut self, params: &DVector<Complex64>);

    /// Compute O_k = ∂ log ψ(σ) / ∂ p_k for all parameters.
    fn log_derivatives(&self, sigma: &DVector<f64>) -> DVector<Complex64>;

    /// Numerical log-derivatives by central difference along the real
    /// parameter axis. For holomorphic parameterizations this equals the
    /// complex derivative; used to validate analytic gradients.
    fn numerical_log_derivatives(&mut self, sigma: &DVector<f64>, h: f64) -> DVector<Complex64> {
        let base = self.params();
        let mut derivs = DVector::zeros(self.num_params());
        for k in 0..self.num_params() {
            let mut shifted = base.clone();
            shifted[k] += Complex64::new(h, 0.0);
            self.set_params(&shifted);
            let fwd = self.log_psi(sigma);
            shifted[k] -= Complex64::new(2.0 * h, 0.0);
            self.set_params(&shifted);
            let bwd = self.log_psi(sigma);
            derivs[k] = (fwd - bwd) / (2.0 * h);
        }
        self.set_params(&base);
        derivs
    }
}
