//! Feed-forward network wave functions.
//!
//! Stacked complex affine layers with a log-cosh nonlinearity; the
//! log-amplitude is the coordinate-wise sum after the final nonlinearity.
//! Parameter gradients are assembled by reverse accumulation through the
//! stack.

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use rand::Rng;

use super::{ln_cosh, random_matrix, random_vector, to_complex};
use crate::wavefunction::{LogWavefunction, VariationalWavefunction};

#[derive(Debug, Clone)]
struct DenseLayer {
    weights: DMatrix<Complex64>,
    bias: DVector<Complex64>,
}

impl DenseLayer {
    fn random<R: Rng + ?Sized>(out_dim: usize, in_dim: usize, rng: &mut R) -> Self {
        Self {
            weights: random_matrix(out_dim, in_dim, rng),
            bias: random_vector(out_dim, rng),
        }
    }

    fn len(&self) -> usize {
        self.weights.len() + self.bias.len()
    }
}

#[derive(Debug, Clone)]
pub struct FeedForward {
    layers: Vec<DenseLayer>,
}

impl FeedForward {
    /// Single affine layer of width `alpha · n_sites`.
    pub fn single<R: Rng + ?Sized>(n_sites: usize, alpha: usize, rng: &mut R) -> Self {
        assert!(alpha >= 1, "layer density must be at least 1");
        Self {
            layers: vec![DenseLayer::random(alpha * n_sites, n_sites, rng)],
        }
    }

    /// Two affine layers of widths `alpha1 · n_sites` and
    /// `alpha2 · n_sites`.
    pub fn two_layer<R: Rng + ?Sized>(
        n_sites: usize,
        alpha1: usize,
        alpha2: usize,
        rng: &mut R,
    ) -> Self {
        assert!(alpha1 >= 1 && alpha2 >= 1, "layer densities must be at least 1");
        let hidden = alpha1 * n_sites;
        Self {
            layers: vec![
                DenseLayer::random(hidden, n_sites, rng),
                DenseLayer::random(alpha2 * n_sites, hidden, rng),
            ],
        }
    }

    pub fn n_layers(&self) -> usize {
        self.layers.len()
    }

    /// Forward pass keeping pre-activations and activations per layer.
    /// `activations[0]` is the input; `activations[l + 1] = ln cosh(z_l)`.
    fn forward(
        &self,
        input: DVector<Complex64>,
    ) -> (Vec<DVector<Complex64>>, Vec<DVector<Complex64>>) {
        let mut pre_activations = Vec::with_capacity(self.layers.len());
        let mut activations = Vec::with_capacity(self.layers.len() + 1);
        activations.push(input);
        for layer in &self.layers {
            let z = &layer.bias + &layer.weights * activations.last().unwrap();
            activations.push(z.map(ln_cosh));
            pre_activations.push(z);
        }
        (pre_activations, activations)
    }
}

impl LogWavefunction for FeedForward {
    fn n_sites(&self) -> usize {
        self.layers[0].weights.ncols()
    }

    fn log_psi(&self, sigma: &DVector<f64>) -> Complex64 {
        let (_, activations) = self.forward(to_complex(sigma));
        activations.last().unwrap().sum()
    }
}

impl VariationalWavefunction for FeedForward {
    fn num_params(&self) -> usize {
        self.layers.iter().map(DenseLayer::len).sum()
    }

    fn params(&self) -> DVector<Complex64> {
        DVector::from_iterator(
            self.num_params(),
            self.layers
                .iter()
                .flat_map(|layer| layer.weights.iter().chain(layer.bias.iter()))
                .copied(),
        )
    }

    fn set_params(&mut self, params: &DVector<Complex64>) {
        assert_eq!(params.len(), self.num_params());
        let mut offset = 0;
        let slice = params.as_slice();
        for layer in &mut self.layers {
            let (rows, cols) = layer.weights.shape();
            layer.weights =
                DMatrix::from_column_slice(rows, cols, &slice[offset..offset + rows * cols]);
            offset += rows * cols;
            layer.bias = DVector::from_column_slice(&slice[offset..offset + rows]);
            offset += rows;
        }
    }

    fn log_derivatives(&self, sigma: &DVector<f64>) -> DVector<Complex64> {
        let (pre_activations, activations) = self.forward(to_complex(sigma));

        // Reverse sweep: the output is a plain sum, so the seed sensitivity
        // of the last pre-activation is tanh(z_L) elementwise.
        let n_layers = self.layers.len();
        let mut weight_grads: Vec<DMatrix<Complex64>> = Vec::with_capacity(n_layers);
        let mut bias_grads: Vec<DVector<Complex64>> = Vec::with_capacity(n_layers);
        let mut delta = pre_activations[n_layers - 1].map(|z| z.tanh());
        for l in (0..n_layers).rev() {
            weight_grads.push(&delta * activations[l].transpose());
            bias_grads.push(delta.clone());
            if l > 0 {
                let upstream = self.layers[l].weights.tr_mul(&delta);
                delta = upstream.zip_map(&pre_activations[l - 1], |g, z| g * z.tanh());
            }
        }
        weight_grads.reverse();
        bias_grads.reverse();

        DVector::from_iterator(
            self.num_params(),
            weight_grads
                .iter()
                .zip(bias_grads.iter())
                .flat_map(|(w, b)| w.iter().chain(b.iter()))
                .copied(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_layer_shapes() {
        let mut rng = StdRng::seed_from_u64(17);
        let shallow = FeedForward::single(10, 2, &mut rng);
        assert_eq!(shallow.n_layers(), 1);
        assert_eq!(shallow.num_params(), 20 * 10 + 20);

        let deep = FeedForward::two_layer(10, 2, 1, &mut rng);
        assert_eq!(deep.n_layers(), 2);
        assert_eq!(deep.num_params(), (20 * 10 + 20) + (10 * 20 + 10));
    }

    #[test]
    fn test_param_round_trip() {
        let mut rng = StdRng::seed_from_u64(23);
        let mut wfn = FeedForward::two_layer(6, 2, 1, &mut rng);
        let params = wfn.params();
        wfn.set_params(&params);
        assert_eq!(wfn.params(), params);
    }

    #[test]
    fn test_deep_network_has_more_params_than_shallow() {
        let mut rng = StdRng::seed_from_u64(29);
        let shallow = FeedForward::single(8, 2, &mut rng);
        let deep = FeedForward::two_layer(8, 2, 1, &mut rng);
        assert!(deep.num_params() > shallow.num_params());
    }
}
