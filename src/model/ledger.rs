// src/model/ledger.rs

use crate::model::queues::DelayLine;
use crate::model::role::Role;
use crate::strategy::traits::NeighborState;

/// Mutable bookkeeping for a single node in the supply chain.
///
/// Only the simulation engine holds these; policies see read-only
/// snapshots built from them.
#[derive(Debug, Clone)]
pub struct RoleLedger {
    // Identity
    role: Role,

    // State Variables
    pub(crate) inventory_on_hand: u32,
    pub(crate) backlog: u32,
    pub(crate) order_pipeline: DelayLine, // Placed, not yet seen by the supplier
    pub(crate) shipment_pipeline: DelayLine, // Dispatched, not yet received

    // Per-period flows
    pub(crate) incoming_order: u32,
    pub(crate) received_shipment: u32,
    pub(crate) last_placed_order: u32,
}

impl RoleLedger {
    /// Builds a ledger with both pipelines primed at `initial_pipeline`.
    ///
    /// A role with a customer starts out facing the order sitting at the
    /// front of that customer's order pipeline.
    pub fn new(
        role: Role,
        initial_inventory: u32,
        initial_pipeline: u32,
        order_lead_time: usize,
        shipment_lead_time: usize,
    ) -> Self {
        let incoming_order = if role.downstream().is_some() {
            initial_pipeline
        } else {
            0
        };

        Self {
            role,
            inventory_on_hand: initial_inventory,
            backlog: 0,
            order_pipeline: DelayLine::new(order_lead_time, initial_pipeline),
            shipment_pipeline: DelayLine::new(shipment_lead_time, initial_pipeline),
            incoming_order,
            received_shipment: 0,
            last_placed_order: 0,
        }
    }

    /// Pulls this period's arrival off the shipment pipeline and leaves an
    /// empty slot at the back for the supplier to fill.
    pub fn receive_shipment(&mut self) -> u32 {
        self.received_shipment = self.shipment_pipeline.rotate(0);
        self.received_shipment
    }

    /// Books the received shipment, then ships against this period's order
    /// plus carried backlog.
    ///
    /// Returns the quantity shipped downstream.
    pub fn fulfill(&mut self) -> u32 {
        self.inventory_on_hand = self.inventory_on_hand.saturating_add(self.received_shipment);

        let demand = self.incoming_order.saturating_add(self.backlog);
        let shipped = self.inventory_on_hand.min(demand);

        self.inventory_on_hand -= shipped;
        self.backlog = demand - shipped;
        shipped
    }

    /// Pushes a freshly placed order into the order pipeline.
    ///
    /// Returns the order now at the front, which is what the supplier sees
    /// as demand next period.
    pub fn place_order(&mut self, quantity: u32) -> u32 {
        self.last_placed_order = quantity;
        self.order_pipeline.rotate(quantity);
        self.order_pipeline.front()
    }

    /// Partial view handed to neighbors when information sharing is on.
    pub fn neighbor_state(&self) -> NeighborState {
        NeighborState {
            role: self.role,
            inventory_on_hand: self.inventory_on_hand,
            backlog: self.backlog,
            last_placed_order: self.last_placed_order,
        }
    }

    /// Holding and backlog cost accrued this period.
    pub fn period_costs(&self, holding_cost: f64, backlog_cost: f64) -> (f64, f64) {
        (
            holding_cost * self.inventory_on_hand as f64,
            backlog_cost * self.backlog as f64,
        )
    }

    pub fn inventory_on_hand(&self) -> u32 {
        self.inventory_on_hand
    }

    pub fn backlog(&self) -> u32 {
        self.backlog
    }

    pub fn incoming_order(&self) -> u32 {
        self.incoming_order
    }

    pub fn received_shipment(&self) -> u32 {
        self.received_shipment
    }

    pub fn last_placed_order(&self) -> u32 {
        self.last_placed_order
    }

    /// Sum of orders placed but not yet visible to the supplier.
    pub fn pipeline_on_order(&self) -> u32 {
        self.order_pipeline.total()
    }

    pub fn order_pipeline(&self) -> &DelayLine {
        &self.order_pipeline
    }

    pub fn shipment_pipeline(&self) -> &DelayLine {
        &self.shipment_pipeline
    }
}
