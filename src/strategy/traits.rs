// src/strategy/traits.rs

use crate::model::role::Role;
use serde::Serialize;
use std::fmt::Debug;

/// Cost rates for the current run, handed to every decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostParams {
    pub holding_cost: f64,
    pub backlog_cost: f64,
}

/// Partial view of another role. Pipeline contents are never exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NeighborState {
    pub role: Role,
    pub inventory_on_hand: u32,
    pub backlog: u32,
    pub last_placed_order: u32,
}

/// What a role may see of one of its neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NeighborView {
    /// Information sharing is off for this run.
    #[default]
    Hidden,
    /// Sharing is on, but there is no neighbor on this side of the chain.
    Absent,
    Visible(NeighborState),
}

impl NeighborView {
    pub fn visible(&self) -> Option<&NeighborState> {
        match self {
            NeighborView::Visible(state) => Some(state),
            NeighborView::Hidden | NeighborView::Absent => None,
        }
    }

    pub fn is_hidden(&self) -> bool {
        matches!(self, NeighborView::Hidden)
    }
}

/// Read-only snapshot of one role at decision time.
///
/// Neighbor views reflect the other roles after this period's fulfillment,
/// never their decisions from the same period.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleState {
    pub period_index: usize,
    pub role: Role,
    pub incoming_order: u32,
    pub received_shipment: u32,
    pub inventory_on_hand: u32,
    pub backlog: u32,
    pub pipeline_on_order: u32,
    pub last_placed_order: u32,
    pub params: CostParams,
    pub upstream_state: NeighborView,
    pub downstream_state: NeighborView,
    /// Every other role in chain order; only filled under full sharing.
    pub chain: Vec<NeighborState>,
}

impl RoleState {
    /// On-hand plus on-order minus backlog.
    pub fn inventory_position(&self) -> i64 {
        self.inventory_on_hand as i64 + self.pipeline_on_order as i64 - self.backlog as i64
    }
}

/// Defines the decision-making logic for a supply chain role.
///
/// We require `Debug` so we can print the agent state if needed.
/// We require `Send` so independent runs can be moved onto worker threads.
pub trait OrderPolicy: Debug + Send {
    /// Calculates how much to order from the upstream supplier.
    ///
    /// The result is signed so that a misbehaving policy is observable:
    /// the engine clamps anything outside `0..=u32::MAX` and records it as
    /// an anomaly.
    fn decide_order(&mut self, state: &RoleState) -> i64;
}
