//! YAML run configuration.
//!
//! Every field has a default matching the demonstration setup (22-site
//! periodic chain, zero magnetization), so a config file only needs to name
//! what it overrides.

use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::VmcError;
use crate::exact::LanczosOptions;
use crate::hamiltonian::Heisenberg;
use crate::hilbert::SpinHalfSector;
use crate::lattice::Chain;

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
#[serde(default)]
pub struct ChainConfig {
    pub n_sites: usize,
    pub periodic: bool,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            n_sites: 22,
            periodic: true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
#[serde(default)]
pub struct OptimizerConfig {
    pub n_samples: usize,
    pub n_discard: usize,
    pub learning_rate: f64,
    pub diag_shift: f64,
    pub iterations: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            n_samples: 1000,
            n_discard: 10,
            learning_rate: 0.02,
            diag_shift: 0.1,
            iterations: 200,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
#[serde(default)]
pub struct AnsatzConfig {
    /// Hidden-unit density for the RBM forms and width of the single-layer
    /// network.
    pub alpha: usize,
    /// First-layer density of the deeper network.
    pub deep_alpha: usize,
}

impl Default for AnsatzConfig {
    fn default() -> Self {
        Self {
            alpha: 1,
            deep_alpha: 2,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
#[serde(default)]
pub struct LanczosConfig {
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for LanczosConfig {
    fn default() -> Self {
        let opts = LanczosOptions::default();
        Self {
            max_iterations: opts.max_iterations,
            tolerance: opts.tolerance,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct RunConfig {
    pub chain: ChainConfig,
    /// Total 2·Sz constraint (Σ σᵢ).
    pub total_2sz: i64,
    pub coupling: f64,
    /// Marshall sign rule; `None` applies it whenever the chain is
    /// bipartite.
    pub sign_rule: Option<bool>,
    pub seed: u64,
    pub optimizer: OptimizerConfig,
    pub ansatz: AnsatzConfig,
    pub lanczos: LanczosConfig,
    pub out_dir: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            chain: ChainConfig::default(),
            total_2sz: 0,
            coupling: 1.0,
            sign_rule: None,
            seed: 1234,
            optimizer: OptimizerConfig::default(),
            ansatz: AnsatzConfig::default(),
            lanczos: LanczosConfig::default(),
            out_dir: "runs".to_string(),
        }
    }
}

impl RunConfig {
    pub fn lattice(&self) -> Chain {
        Chain::new(self.chain.n_sites, self.chain.periodic)
    }

    pub fn sector(&self) -> Result<SpinHalfSector, VmcError> {
        SpinHalfSector::new(self.chain.n_sites, self.total_2sz)
    }

    pub fn hamiltonian(&self) -> Result<Heisenberg, VmcError> {
        let chain = self.lattice();
        match self.sign_rule {
            Some(rule) => Heisenberg::with_sign_rule(&chain, self.coupling, rule),
            None => Ok(Heisenberg::new(&chain, self.coupling)),
        }
    }

    pub fn lanczos_options(&self) -> LanczosOptions {
        LanczosOptions {
            max_iterations: self.lanczos.max_iterations,
            tolerance: self.lanczos.tolerance,
            seed: self.seed,
        }
    }
}

/// Read a run configuration from a YAML file.
pub fn read_config(path: &Path) -> Result<RunConfig, VmcError> {
    let reader = BufReader::new(std::fs::File::open(path)?);
    Ok(serde_yaml::from_reader(reader)?)
}
