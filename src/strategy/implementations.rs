// src/strategy/implementations.rs

use crate::strategy::traits::{OrderPolicy, RoleState};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// =========================================================================
// 1. Naive Policy (Pass-Through)
// =========================================================================

/// The "Panic" strategy. It simply orders exactly what was demanded of it.
/// It ignores inventory levels and backlogs.
#[derive(Debug, Clone, Default)]
pub struct NaivePolicy;

impl NaivePolicy {
    pub fn new() -> Self {
        Self
    }
}

impl OrderPolicy for NaivePolicy {
    fn decide_order(&mut self, state: &RoleState) -> i64 {
        state.incoming_order as i64
    }
}

// =========================================================================
// 2. Random Policy
// =========================================================================

/// Orders a random amount within a specific range.
/// Useful for simulating chaotic actors or testing system stability.
///
/// Seeded, so two policies built with the same seed order identically.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    min: u32,
    max: u32,
    rng: ChaCha8Rng,
}

impl RandomPolicy {
    pub fn new(min: u32, max: u32, seed: u64) -> Self {
        Self {
            min: min.min(max),
            max: max.max(min),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl OrderPolicy for RandomPolicy {
    fn decide_order(&mut self, _state: &RoleState) -> i64 {
        self.rng.gen_range(self.min..=self.max) as i64
    }
}

// =========================================================================
// 3. Order-Up-To Policy (Passive Pipeline)
// =========================================================================

/// Textbook inventory-position policy.
///
/// Formula: Order = Target + IncomingOrder + Backlog - OnHand - OnOrder
///
/// Places no net order once on-hand plus on-order covers the target and
/// the outstanding demand.
#[derive(Debug, Clone)]
pub struct OrderUpToPolicy {
    target_inventory: i64,
}

impl OrderUpToPolicy {
    pub fn new(target_inventory: u32) -> Self {
        Self {
            target_inventory: target_inventory as i64,
        }
    }
}

impl OrderPolicy for OrderUpToPolicy {
    fn decide_order(&mut self, state: &RoleState) -> i64 {
        let owed = state.incoming_order as i64 + state.backlog as i64;
        let covered = state.inventory_on_hand as i64 + state.pipeline_on_order as i64;
        (self.target_inventory + owed - covered).max(0)
    }
}

// =========================================================================
// 4. Smoothing Policy (Rate-Limited)
// =========================================================================
// Forecasts demand with exponential smoothing and only moves the inventory
// position toward target by a bounded step each period.

#[derive(Debug, Clone)]
pub struct SmoothingPolicy {
    target_inventory: i64,
    alpha: f64, // Smoothing factor (0.1 = very stable, 0.9 = reactive)
    max_correction: i64,
    smoothed_demand: Option<f64>,
}

/// Smoothing factor used when the caller passes NaN.
pub const DEFAULT_ALPHA: f64 = 0.3;

/// Clamps into `[0, 1]`, replacing NaN with `fallback`.
fn unit_interval(value: f64, fallback: f64) -> f64 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(0.0, 1.0)
    }
}

impl SmoothingPolicy {
    pub fn new(target_inventory: u32, alpha: f64, max_correction: u32) -> Self {
        Self {
            target_inventory: target_inventory as i64,
            alpha: unit_interval(alpha, DEFAULT_ALPHA),
            max_correction: max_correction as i64,
            smoothed_demand: None,
        }
    }

    pub fn smoothed_demand(&self) -> Option<f64> {
        self.smoothed_demand
    }
}

impl OrderPolicy for SmoothingPolicy {
    fn decide_order(&mut self, state: &RoleState) -> i64 {
        // 1. Update Forecast
        let demand = state.incoming_order as f64;
        let smoothed = match self.smoothed_demand {
            Some(prev) => self.alpha * demand + (1.0 - self.alpha) * prev,
            None => demand,
        };
        self.smoothed_demand = Some(smoothed);

        // 2. Rate-limited move toward target position
        let gap = self.target_inventory - state.inventory_position();
        let correction = gap.clamp(-self.max_correction, self.max_correction);
        let mut order = smoothed + correction as f64;

        // 3. Dampen when neighbors are visible
        let target = self.target_inventory as f64;
        if let Some(up) = state.upstream_state.visible() {
            // A strained supplier cannot absorb a bigger order anyway
            if up.backlog > 0 {
                order *= 0.85;
            }
        }
        if let Some(down) = state.downstream_state.visible() {
            if down.inventory_on_hand as f64 > target * 1.5 {
                order *= 0.8;
            } else if down.backlog as f64 > target * 0.5 {
                order = (order + 2.0).min((smoothed * 1.3).max(order));
            }
        }

        order.round().max(0.0) as i64
    }
}

// =========================================================================
// 5. Info-Aware Policy
// =========================================================================

/// Order-up-to base order nudged by what the neighbors reveal.
///
/// The neighbor-driven adjustment is clamped to `max_adjustment` units.
/// With hidden views the policy orders exactly its base order.
#[derive(Debug, Clone)]
pub struct InfoAwarePolicy {
    target_inventory: i64,
    alpha: f64,
    info_weight: f64,
    max_adjustment: f64,
    smoothed_demand: Option<f64>,
}

impl InfoAwarePolicy {
    const MAX_GAP_CORRECTION: i64 = 3;

    pub fn new(target_inventory: u32, alpha: f64, info_weight: f64, max_adjustment: u32) -> Self {
        Self {
            target_inventory: target_inventory as i64,
            alpha: unit_interval(alpha, DEFAULT_ALPHA),
            // NaN weight ignores the neighbors
            info_weight: unit_interval(info_weight, 0.0),
            max_adjustment: max_adjustment as f64,
            smoothed_demand: None,
        }
    }

    fn neighbor_adjustment(&self, state: &RoleState) -> f64 {
        let target = self.target_inventory as f64;
        let demand = state.incoming_order as f64;
        let mut adjustment = 0.0;

        if let Some(down) = state.downstream_state.visible() {
            // Backlog downstream means demand will stay high
            if down.backlog > 3 {
                adjustment += (down.backlog as f64 * 0.3).min(3.0);
            }
            if down.inventory_on_hand as f64 > target * 1.5 {
                adjustment -= ((down.inventory_on_hand as f64 - target) * 0.2).min(3.0);
            }
            // Their last order is a leading indicator of ours
            let leading = down.last_placed_order as f64;
            if leading > demand * 1.3 {
                adjustment += 1.0;
            } else if leading < demand * 0.7 {
                adjustment -= 1.0;
            }
        }

        if let Some(up) = state.upstream_state.visible() {
            if up.backlog > 2 {
                adjustment -= (up.backlog as f64 * 0.2).min(2.0);
            }
            if up.inventory_on_hand as f64 > target * 2.0 {
                adjustment += 0.5;
            }
        }

        (adjustment * self.info_weight).clamp(-self.max_adjustment, self.max_adjustment)
    }
}

impl OrderPolicy for InfoAwarePolicy {
    fn decide_order(&mut self, state: &RoleState) -> i64 {
        let demand = state.incoming_order as f64;
        let smoothed = match self.smoothed_demand {
            Some(prev) => self.alpha * demand + (1.0 - self.alpha) * prev,
            None => demand,
        };
        self.smoothed_demand = Some(smoothed);

        let gap = self.target_inventory - state.inventory_position();
        let base = smoothed + gap.clamp(-Self::MAX_GAP_CORRECTION, Self::MAX_GAP_CORRECTION) as f64;

        (base + self.neighbor_adjustment(state)).round().max(0.0) as i64
    }
}
