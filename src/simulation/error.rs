// src/simulation/error.rs

use crate::model::role::Role;
use thiserror::Error;

/// Everything that can stop a run from being built or its output from
/// being exported. Per-period arithmetic never fails.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// A role in the chain has no ordering policy.
    #[error("missing agent for role {0}")]
    MissingAgent(Role),

    #[error("invalid config field `{field}`: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },

    #[error("could not parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not write report: {0}")]
    Report(#[from] csv::Error),
}

impl SimulationError {
    pub(crate) fn invalid(field: &'static str, reason: &'static str) -> Self {
        SimulationError::InvalidConfig { field, reason }
    }
}
