//! Fixed-magnetization configuration space of a spin-1/2 chain.
//!
//! Configurations are length-N vectors with entries ±1 (spin up/down).
//! The sector fixes the total 2·Sz = Σᵢ σᵢ, equivalently the number of up
//! spins. Basis states are also exposed as bitmasks (bit i set means σᵢ = +1)
//! for the exact solver, enumerated in ascending numeric order.

use nalgebra::DVector;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::VmcError;

/// Binomial coefficient C(n, k), exact in u128 then narrowed.
fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        acc = acc * (n - i) as u128 / (i + 1) as u128;
    }
    acc as usize
}

/// The subset of spin configurations with a fixed total magnetization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpinHalfSector {
    n_sites: usize,
    n_up: usize,
}

impl SpinHalfSector {
    /// Sector with total 2·Sz = `total_2sz` on `n_sites` spins.
    pub fn new(n_sites: usize, total_2sz: i64) -> Result<Self, VmcError> {
        if n_sites < 2 || n_sites >= 64 {
            return Err(VmcError::configuration(format!(
                "sector supports 2..=63 sites, got {}",
                n_sites
            )));
        }
        if total_2sz.unsigned_abs() as usize > n_sites {
            return Err(VmcError::configuration(format!(
                "|2Sz| = {} exceeds {} sites",
                total_2sz, n_sites
            )));
        }
        if (n_sites as i64 + total_2sz) % 2 != 0 {
            return Err(VmcError::configuration(format!(
                "2Sz = {} has wrong parity for {} sites",
                total_2sz, n_sites
            )));
        }
        let n_up = ((n_sites as i64 + total_2sz) / 2) as usize;
        Ok(Self { n_sites, n_up })
    }

    /// The zero-magnetization sector; requires an even site count.
    pub fn zero_magnetization(n_sites: usize) -> Result<Self, VmcError> {
        Self::new(n_sites, 0)
    }

    pub fn n_sites(&self) -> usize {
        self.n_sites
    }

    pub fn n_up(&self) -> usize {
        self.n_up
    }

    pub fn total_2sz(&self) -> i64 {
        2 * self.n_up as i64 - self.n_sites as i64
    }

    /// Number of basis states, C(n_sites, n_up).
    pub fn dim(&self) -> usize {
        binomial(self.n_sites, self.n_up)
    }

    /// Whether a configuration lies in this sector.
    pub fn contains(&self, sigma: &DVector<f64>) -> bool {
        sigma.len() == self.n_sites
            && sigma.iter().all(|&s| s == 1.0 || s == -1.0)
            && sigma.iter().sum::<f64>() as i64 == self.total_2sz()
    }

    /// Uniformly random configuration in the sector.
    pub fn random_config<R: Rng + ?Sized>(&self, rng: &mut R) -> DVector<f64> {
        let mut spins = vec![-1.0; self.n_sites];
        for s in spins.iter_mut().take(self.n_up) {
            *s = 1.0;
        }
        spins.shuffle(rng);
        DVector::from_vec(spins)
    }

    /// All basis states as bitmasks, ascending (Gosper's hack).
    pub fn states(&self) -> Vec<u64> {
        if self.n_up == 0 {
            return vec![0];
        }
        let mut states = Vec::with_capacity(self.dim());
        let limit: u64 = 1 << self.n_sites;
        let mut v: u64 = (1 << self.n_up) - 1;
        while v < limit {
            states.push(v);
            let t = v | (v - 1);
            let nt = !t;
            let lowest = nt & nt.wrapping_neg();
            v = (t + 1) | ((lowest - 1) >> (v.trailing_zeros() + 1));
        }
        states
    }

    /// Position of `bits` in the ascending basis enumeration, by the
    /// combinatorial number system: rank = Σᵢ C(pᵢ, i+1) over the sorted
    /// set-bit positions pᵢ.
    pub fn rank(&self, bits: u64) -> usize {
        debug_assert_eq!(bits.count_ones() as usize, self.n_up);
        let mut rank = 0;
        let mut idx = 0;
        for p in 0..self.n_sites {
            if bits >> p & 1 == 1 {
                idx += 1;
                rank += binomial(p, idx);
            }
        }
        rank
    }

    pub fn bits_to_config(&self, bits: u64) -> DVector<f64> {
        DVector::from_fn(self.n_sites, |i, _| {
            if bits >> i & 1 == 1 {
                1.0
            } else {
                -1.0
            }
        })
    }

    pub fn config_to_bits(&self, sigma: &DVector<f64>) -> u64 {
        let mut bits = 0u64;
        for (i, &s) in sigma.iter().enumerate() {
            if s > 0.0 {
                bits |= 1 << i;
            }
        }
        bits
    }
}
