// src/simulation/engine.rs

use crate::io::demand::DemandSource;
use crate::model::ledger::RoleLedger;
use crate::model::role::Role;
use crate::simulation::config::{InformationSharing, SimulationConfig};
use crate::simulation::error::SimulationError;
use crate::simulation::log::{LogRecord, OrderAnomaly, RunLog};
use crate::strategy::traits::{CostParams, NeighborState, NeighborView, OrderPolicy, RoleState};
use tracing::{debug, info, trace, warn};

/// The step orchestrator: owns every ledger and advances the whole chain
/// one period at a time.
pub struct Simulation {
    config: SimulationConfig,

    // The Actors, indexed by `Role::index`
    ledgers: [RoleLedger; 4],
    agents: Vec<Box<dyn OrderPolicy>>,

    // Inputs/Outputs
    demand: Box<dyn DemandSource>,
    current_period: usize,
    log: RunLog,
}

impl Simulation {
    /// Builds a run from a `{role: agent}` mapping.
    ///
    /// Fails before any state is created if the config is invalid or any
    /// role of the chain has no agent. A role supplied twice keeps the
    /// last agent.
    pub fn new<I>(
        agents: I,
        demand: impl DemandSource + 'static,
        config: SimulationConfig,
    ) -> Result<Self, SimulationError>
    where
        I: IntoIterator<Item = (Role, Box<dyn OrderPolicy>)>,
    {
        config.validate()?;

        let mut slots: [Option<Box<dyn OrderPolicy>>; 4] = Default::default();
        for (role, agent) in agents {
            slots[role.index()] = Some(agent);
        }
        let agents = Role::ALL
            .iter()
            .map(|role| {
                slots[role.index()]
                    .take()
                    .ok_or(SimulationError::MissingAgent(*role))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let ledgers = Role::ALL.map(|role| {
            RoleLedger::new(
                role,
                config.initial_inventory,
                config.initial_pipeline,
                config.order_lead_time,
                config.shipment_lead_time,
            )
        });

        Ok(Self {
            log: RunLog::default(),
            config,
            ledgers,
            agents,
            demand: Box::new(demand),
            current_period: 0,
        })
    }

    /// Runs every remaining period and hands back the log.
    pub fn run(mut self) -> RunLog {
        info!(
            periods = self.config.periods,
            order_lead_time = self.config.order_lead_time,
            shipment_lead_time = self.config.shipment_lead_time,
            sharing = ?self.config.information_sharing,
            "starting simulation run"
        );

        while self.step() {}

        info!(
            rows = self.log.len(),
            anomalies = self.log.anomalies().len(),
            total_cost = self.log.total_cost(),
            "simulation run complete"
        );
        self.log
    }

    /// Advances the chain by exactly one period.
    ///
    /// Returns `false`, without touching any state, once all configured
    /// periods have run.
    pub fn step(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        let period = self.current_period;

        // 1. External customer demand
        let customer_demand = self.demand.demand(period);
        self.ledgers[Role::Retailer.index()].incoming_order = customer_demand;
        debug!(period, customer_demand, "period start");

        // 2. Shipments arrive; each line gets an empty back slot
        for ledger in self.ledgers.iter_mut() {
            ledger.receive_shipment();
        }

        // 3. Fulfil demand and dispatch downstream
        let mut served = [0u32; 4];
        let mut shipped = [0u32; 4];
        for role in Role::ALL {
            let i = role.index();
            served[i] = self.ledgers[i].incoming_order;
            shipped[i] = self.ledgers[i].fulfill();
            if let Some(down) = role.downstream() {
                self.ledgers[down.index()]
                    .shipment_pipeline
                    .add_to_back(shipped[i]);
            }
        }

        // 4. Decisions, all against the same post-fulfilment snapshot
        let snapshots: [NeighborState; 4] =
            std::array::from_fn(|i| self.ledgers[i].neighbor_state());
        let mut placed = [0u32; 4];
        for role in Role::ALL {
            let i = role.index();
            let state = self.role_state(role, period, &snapshots);
            let requested = self.agents[i].decide_order(&state);
            placed[i] = self.clamp_order(period, role, requested);
            trace!(period, %role, requested, placed = placed[i], "order decided");
        }

        // 5. Orders enter the pipelines; the front becomes supplier demand
        for role in Role::ALL {
            let i = role.index();
            let front = self.ledgers[i].place_order(placed[i]);
            match role.upstream() {
                Some(up) => self.ledgers[up.index()].incoming_order = front,
                None if self.config.factory_production => {
                    self.ledgers[i].shipment_pipeline.add_to_back(placed[i]);
                }
                None => {}
            }
        }

        // 6. Costs and logging
        for role in Role::ALL {
            let i = role.index();
            let ledger = &self.ledgers[i];
            let (cost_holding, cost_backlog) =
                ledger.period_costs(self.config.holding_cost, self.config.backlog_cost);
            self.log.push(LogRecord {
                period,
                role,
                incoming_order: served[i],
                placed_order: placed[i],
                received_shipment: ledger.received_shipment,
                shipped: shipped[i],
                inventory_on_hand: ledger.inventory_on_hand,
                backlog: ledger.backlog,
                pipeline_on_order: ledger.pipeline_on_order(),
                cost_holding,
                cost_backlog,
            });
        }

        self.current_period += 1;
        true
    }

    fn role_state(&self, role: Role, period: usize, snapshots: &[NeighborState; 4]) -> RoleState {
        let sharing = self.config.information_sharing;
        let view = |neighbor: Option<Role>| {
            if !sharing.shares_neighbors() {
                return NeighborView::Hidden;
            }
            match neighbor {
                Some(other) => NeighborView::Visible(snapshots[other.index()]),
                None => NeighborView::Absent,
            }
        };
        let chain = if sharing == InformationSharing::Full {
            Role::ALL
                .iter()
                .filter(|other| **other != role)
                .map(|other| snapshots[other.index()])
                .collect()
        } else {
            Vec::new()
        };

        let ledger = &self.ledgers[role.index()];
        RoleState {
            period_index: period,
            role,
            incoming_order: ledger.incoming_order,
            received_shipment: ledger.received_shipment,
            inventory_on_hand: ledger.inventory_on_hand,
            backlog: ledger.backlog,
            pipeline_on_order: ledger.pipeline_on_order(),
            last_placed_order: ledger.last_placed_order,
            params: CostParams {
                holding_cost: self.config.holding_cost,
                backlog_cost: self.config.backlog_cost,
            },
            upstream_state: view(role.upstream()),
            downstream_state: view(role.downstream()),
            chain,
        }
    }

    fn clamp_order(&mut self, period: usize, role: Role, requested: i64) -> u32 {
        let applied = requested.clamp(0, u32::MAX as i64) as u32;
        if applied as i64 != requested {
            warn!(period, %role, requested, applied, "policy returned an out-of-range order");
            self.log.push_anomaly(OrderAnomaly {
                period,
                role,
                requested,
                applied,
            });
        }
        applied
    }

    pub fn is_finished(&self) -> bool {
        self.current_period >= self.config.periods
    }

    /// Index of the next period to execute.
    pub fn current_period(&self) -> usize {
        self.current_period
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn ledger(&self, role: Role) -> &RoleLedger {
        &self.ledgers[role.index()]
    }

    /// Rows appended so far.
    pub fn log(&self) -> &RunLog {
        &self.log
    }
}
