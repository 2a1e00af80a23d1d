// src/simulation/config.rs

use crate::simulation::error::SimulationError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// How much of the neighboring roles a decision may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InformationSharing {
    /// Classic beer game: each role sees only its own ledger.
    #[default]
    None,
    /// Upstream and downstream neighbor views.
    Adjacent,
    /// Adjacent views plus every other role in the chain.
    Full,
}

impl InformationSharing {
    pub fn shares_neighbors(self) -> bool {
        !matches!(self, InformationSharing::None)
    }
}

/// Immutable parameters of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub periods: usize,
    pub order_lead_time: usize,
    pub shipment_lead_time: usize,
    pub initial_inventory: u32,
    pub initial_pipeline: u32,
    pub holding_cost: f64,
    pub backlog_cost: f64,
    pub random_seed: Option<u64>,
    pub information_sharing: InformationSharing,
    /// Route the factory's own orders back into its shipment pipeline.
    pub factory_production: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            periods: 52,
            order_lead_time: 1,
            shipment_lead_time: 2,
            initial_inventory: 12,
            initial_pipeline: 4,
            holding_cost: 0.5,
            backlog_cost: 1.0,
            random_seed: Some(42),
            information_sharing: InformationSharing::None,
            factory_production: false,
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> Result<Self, SimulationError> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SimulationError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Checks the parameters a run cannot start without.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.order_lead_time == 0 {
            return Err(SimulationError::invalid(
                "order_lead_time",
                "must be at least one period",
            ));
        }
        if self.shipment_lead_time == 0 {
            return Err(SimulationError::invalid(
                "shipment_lead_time",
                "must be at least one period",
            ));
        }
        for (field, rate) in [
            ("holding_cost", self.holding_cost),
            ("backlog_cost", self.backlog_cost),
        ] {
            if !rate.is_finite() || rate < 0.0 {
                return Err(SimulationError::invalid(
                    field,
                    "must be a finite, non-negative rate",
                ));
            }
        }
        Ok(())
    }

    /// Derives an independent seed for one consumer of randomness
    /// (demand, or one stream per role).
    ///
    /// Same `random_seed` and `stream` always give the same value.
    pub fn derive_seed(&self, stream: u64) -> u64 {
        let base = self.random_seed.unwrap_or(0);
        // splitmix64 finalizer
        let mut z = base
            .wrapping_add(stream.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}
