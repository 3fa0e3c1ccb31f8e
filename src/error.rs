//! Error types for spin-chain VMC runs.

use thiserror::Error;

/// Errors that can occur while configuring or running a VMC calculation.
#[derive(Debug, Error)]
pub enum VmcError {
    /// Physics objects were configured inconsistently.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// An optimization or eigensolver run failed to produce a finite result.
    #[error("run '{run}' diverged at iteration {iteration}")]
    Convergence { run: String, iteration: usize },

    /// A named run log was requested but is not on disk.
    #[error("missing log for run '{0}'")]
    MissingLog(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Format(#[from] serde_yaml::Error),
}

impl VmcError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_message() {
        let err = VmcError::configuration("chain needs at least 2 sites");
        assert!(format!("{}", err).contains("at least 2 sites"));
    }

    #[test]
    fn test_convergence_names_run() {
        let err = VmcError::Convergence { run: "rbm".to_string(), iteration: 17 };
        let msg = format!("{}", err);
        assert!(msg.contains("rbm"));
        assert!(msg.contains("17"));
    }
}
