//! Four-echelon distribution game (retailer, wholesaler, distributor,
//! factory) for studying demand amplification along a supply chain.
//!
//! Build a [`Simulation`] from one [`OrderPolicy`] per [`Role`], a
//! [`DemandSource`] and a [`SimulationConfig`], then call
//! [`Simulation::run`] to get the [`RunLog`].

pub mod io;
pub mod model;
pub mod simulation;
pub mod strategy;

pub use crate::io::demand::DemandSource;
pub use crate::model::role::Role;
pub use crate::simulation::config::{InformationSharing, SimulationConfig};
pub use crate::simulation::engine::Simulation;
pub use crate::simulation::error::SimulationError;
pub use crate::simulation::log::{LogRecord, OrderAnomaly, RunLog};
pub use crate::strategy::traits::{CostParams, NeighborState, NeighborView, OrderPolicy, RoleState};
