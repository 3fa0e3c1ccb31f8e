//! Configuration and run-log persistence.

mod config;
mod log;

pub use config::{read_config, AnsatzConfig, ChainConfig, LanczosConfig, OptimizerConfig, RunConfig};
pub use log::{EnergySeries, Metrics, RunLog};
