//! 1-D chain lattice for spin models.

use serde::{Deserialize, Serialize};

/// A finite chain of sites with nearest-neighbour adjacency.
///
/// The bond list is the single source of truth for the Hamiltonian and the
/// exchange sampler; it is fixed at construction.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chain {
    n_sites: usize,
    periodic: bool,
}

impl Chain {
    pub fn new(n_sites: usize, periodic: bool) -> Self {
        assert!(n_sites >= 2, "chain needs at least two sites");
        Self { n_sites, periodic }
    }

    pub fn n_sites(&self) -> usize {
        self.n_sites
    }

    pub fn periodic(&self) -> bool {
        self.periodic
    }

    /// Ordered nearest-neighbour bonds. The wrap-around bond is included
    /// only for periodic chains with more than two sites; a periodic
    /// two-site chain has a single bond.
    pub fn bonds(&self) -> Vec<(usize, usize)> {
        let mut bonds: Vec<(usize, usize)> = (0..self.n_sites - 1)
            .map(|i| (i, i + 1))
            .collect();
        if self.periodic && self.n_sites > 2 {
            bonds.push((self.n_sites - 1, 0));
        }
        bonds
    }

    /// A chain is bipartite unless it closes into an odd ring.
    pub fn is_bipartite(&self) -> bool {
        !self.periodic || self.n_sites % 2 == 0
    }
}
