// src/simulation/log.rs

use crate::model::role::Role;
use serde::Serialize;

// Serialize so the run can be exported to CSV later
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    pub period: usize,
    pub role: Role,
    /// Demand this role served in this period.
    pub incoming_order: u32,
    pub placed_order: u32,
    pub received_shipment: u32,
    pub shipped: u32,
    pub inventory_on_hand: u32,
    pub backlog: u32,
    /// Order-pipeline total after this period's order was pushed.
    pub pipeline_on_order: u32,
    pub cost_holding: f64,
    pub cost_backlog: f64,
}

impl LogRecord {
    pub fn total_cost(&self) -> f64 {
        self.cost_holding + self.cost_backlog
    }
}

/// A decision the engine had to clamp before applying it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderAnomaly {
    pub period: usize,
    pub role: Role,
    pub requested: i64,
    pub applied: u32,
}

/// Append-only output of one run.
///
/// Records are in (period, chain order) order: four rows per period,
/// retailer first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunLog {
    records: Vec<LogRecord>,
    anomalies: Vec<OrderAnomaly>,
}

impl RunLog {
    pub(crate) fn push(&mut self, record: LogRecord) {
        self.records.push(record);
    }

    pub(crate) fn push_anomaly(&mut self, anomaly: OrderAnomaly) {
        self.anomalies.push(anomaly);
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    /// Orders the engine clamped; empty for a well-behaved set of policies.
    pub fn anomalies(&self) -> &[OrderAnomaly] {
        &self.anomalies
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// One role's rows, in period order.
    pub fn for_role(&self, role: Role) -> impl Iterator<Item = &LogRecord> + '_ {
        self.records.iter().filter(move |record| record.role == role)
    }

    pub fn record(&self, period: usize, role: Role) -> Option<&LogRecord> {
        let index = period
            .checked_mul(Role::ALL.len())?
            .checked_add(role.index())?;
        self.records
            .get(index)
            .filter(|record| record.period == period && record.role == role)
    }

    /// Total cost for a specific role across all periods
    pub fn total_cost_for_role(&self, role: Role) -> f64 {
        self.for_role(role).map(LogRecord::total_cost).sum()
    }

    /// Total cost for the entire supply chain across all periods
    pub fn total_cost(&self) -> f64 {
        self.records.iter().map(LogRecord::total_cost).sum()
    }

    /// Cost breakdown by stage, in chain order
    pub fn cost_breakdown(&self) -> Vec<(Role, f64)> {
        Role::ALL
            .iter()
            .map(|&role| (role, self.total_cost_for_role(role)))
            .collect()
    }
}
