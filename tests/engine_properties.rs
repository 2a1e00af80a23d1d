use bullwhip_sim::io::demand::{ConstantDemand, NoisyDemand, StepDemand};
use bullwhip_sim::io::reporting::write_run_log;
use bullwhip_sim::strategy::implementations::{
    InfoAwarePolicy, OrderUpToPolicy, RandomPolicy, SmoothingPolicy,
};
use bullwhip_sim::{
    OrderPolicy, Role, RoleState, RunLog, Simulation, SimulationConfig, SimulationError,
};
use std::collections::HashMap;
use std::thread;

fn order_up_to_chain(target: u32) -> HashMap<Role, Box<dyn OrderPolicy>> {
    Role::ALL
        .iter()
        .map(|&role| (role, Box::new(OrderUpToPolicy::new(target)) as Box<dyn OrderPolicy>))
        .collect()
}

fn config(periods: usize, order_lead_time: usize, shipment_lead_time: usize) -> SimulationConfig {
    SimulationConfig {
        periods,
        order_lead_time,
        shipment_lead_time,
        ..SimulationConfig::default()
    }
}

/// Orders a value unique to (period, role) so it can be traced through the
/// order pipeline.
#[derive(Debug)]
struct TaggedPolicy;

impl OrderPolicy for TaggedPolicy {
    fn decide_order(&mut self, state: &RoleState) -> i64 {
        (state.period_index as i64 + 1) * 10 + state.role.index() as i64
    }
}

#[derive(Debug)]
struct ConstantPolicy(i64);

impl OrderPolicy for ConstantPolicy {
    fn decide_order(&mut self, _state: &RoleState) -> i64 {
        self.0
    }
}

fn noisy_run(config: &SimulationConfig) -> RunLog {
    let agents: Vec<(Role, Box<dyn OrderPolicy>)> = vec![
        (
            Role::Retailer,
            Box::new(RandomPolicy::new(0, 12, config.derive_seed(1))) as Box<dyn OrderPolicy>,
        ),
        (Role::Wholesaler, Box::new(SmoothingPolicy::new(12, 0.3, 4)) as Box<dyn OrderPolicy>),
        (
            Role::Distributor,
            Box::new(RandomPolicy::new(2, 9, config.derive_seed(3))) as Box<dyn OrderPolicy>,
        ),
        (Role::Factory, Box::new(InfoAwarePolicy::new(12, 0.3, 0.5, 3)) as Box<dyn OrderPolicy>),
    ];
    let demand = NoisyDemand::new(6, 4, config.derive_seed(0));
    Simulation::new(agents, demand, config.clone()).unwrap().run()
}

#[test]
fn boundary_scenario_never_backlogs() {
    let cfg = SimulationConfig {
        periods: 5,
        order_lead_time: 1,
        shipment_lead_time: 2,
        initial_inventory: 12,
        initial_pipeline: 4,
        ..SimulationConfig::default()
    };
    let log = Simulation::new(order_up_to_chain(12), ConstantDemand::new(4), cfg)
        .unwrap()
        .run();

    assert_eq!(log.len(), 20);
    assert!(log.records().iter().all(|r| r.backlog == 0));
    assert!(log.anomalies().is_empty());

    // Both pipelines start primed at 4, so the chain begins with a full
    // order and shipment pipeline on top of 12 on hand. That leaves the
    // retailer 4 above the order-up-to equilibrium (12 - 4 * 1), and it
    // alternates while it works the surplus off.
    let retailer: Vec<u32> = log.for_role(Role::Retailer).map(|r| r.placed_order).collect();
    assert_eq!(retailer, vec![0, 4, 0, 8, 0]);
}

#[test]
fn steady_state_from_equilibrium_start() {
    for (order_lead_time, inventory) in [(1usize, 8u32), (2, 4)] {
        let cfg = SimulationConfig {
            periods: 12,
            order_lead_time,
            shipment_lead_time: 2,
            initial_inventory: inventory,
            initial_pipeline: 4,
            factory_production: true,
            ..SimulationConfig::default()
        };
        let log = Simulation::new(order_up_to_chain(12), ConstantDemand::new(4), cfg)
            .unwrap()
            .run();

        for record in log.records() {
            assert_eq!(record.placed_order, 4, "{record:?}");
            assert_eq!(record.incoming_order, 4);
            assert_eq!(record.received_shipment, 4);
            assert_eq!(record.inventory_on_hand, inventory);
            assert_eq!(record.backlog, 0);
            assert_eq!(record.inventory_on_hand + record.pipeline_on_order, 12);
        }
    }
}

#[test]
fn steady_state_after_warm_up() {
    let cfg = SimulationConfig {
        periods: 40,
        order_lead_time: 1,
        shipment_lead_time: 1,
        initial_inventory: 12,
        initial_pipeline: 4,
        factory_production: true,
        ..SimulationConfig::default()
    };
    let log = Simulation::new(order_up_to_chain(12), ConstantDemand::new(4), cfg)
        .unwrap()
        .run();

    for role in [Role::Retailer, Role::Wholesaler, Role::Distributor] {
        for record in log.for_role(role).filter(|r| r.period >= 10) {
            assert_eq!(record.placed_order, 4, "{record:?}");
            assert_eq!(record.backlog, 0);
            // inventory position is back at target
            assert_eq!(record.inventory_on_hand + record.pipeline_on_order, 12);
        }
    }
}

#[test]
fn orders_surface_upstream_after_exactly_the_order_lead_time() {
    for lead in 1..=3 {
        let agents: Vec<(Role, Box<dyn OrderPolicy>)> = Role::ALL
            .iter()
            .map(|&role| (role, Box::new(TaggedPolicy) as Box<dyn OrderPolicy>))
            .collect();
        let cfg = SimulationConfig {
            initial_inventory: 1000,
            ..config(12, lead, 2)
        };
        let log = Simulation::new(agents, StepDemand::new(3, 7, 5), cfg)
            .unwrap()
            .run();

        for role in [Role::Retailer, Role::Wholesaler, Role::Distributor] {
            let supplier = role.upstream().unwrap();
            for t in 0..12 {
                let seen = log.record(t, supplier).unwrap().incoming_order;
                if t < lead {
                    assert_eq!(seen, 4, "lead {lead}, {supplier} at {t}");
                } else {
                    let placed = log.record(t - lead, role).unwrap().placed_order;
                    assert_eq!(seen, placed, "lead {lead}, {supplier} at {t}");
                }
            }
        }

        let demand: Vec<u32> = log.for_role(Role::Retailer).map(|r| r.incoming_order).collect();
        assert_eq!(demand, vec![3, 3, 3, 3, 3, 7, 7, 7, 7, 7, 7, 7]);
    }
}

#[test]
fn shipments_are_conserved_across_the_lead_time() {
    for lead in 1..=3 {
        let cfg = SimulationConfig {
            random_seed: Some(lead as u64),
            ..config(30, 2, lead)
        };
        let log = noisy_run(&cfg);

        for role in [Role::Retailer, Role::Wholesaler, Role::Distributor] {
            let supplier = role.upstream().unwrap();
            let mut received_total = 0u64;
            let mut shipped_total = 0u64;
            for t in 0..30 {
                let received = log.record(t, role).unwrap().received_shipment;
                if t < lead {
                    assert_eq!(received, cfg.initial_pipeline);
                } else {
                    let shipped = log.record(t - lead, supplier).unwrap().shipped;
                    assert_eq!(received, shipped, "{role} at {t}");
                    received_total += received as u64;
                    shipped_total += shipped as u64;
                }
            }
            assert_eq!(received_total, shipped_total);
        }

        // Without production the factory only drains its primed pipeline.
        for record in log.for_role(Role::Factory) {
            let expected = if record.period < lead { cfg.initial_pipeline } else { 0 };
            assert_eq!(record.received_shipment, expected);
        }
    }
}

#[test]
fn factory_production_arrives_after_the_shipment_lead_time() {
    let cfg = SimulationConfig {
        factory_production: true,
        initial_inventory: 1000,
        ..config(10, 1, 3)
    };
    let agents: Vec<(Role, Box<dyn OrderPolicy>)> = Role::ALL
        .iter()
        .map(|&role| (role, Box::new(TaggedPolicy) as Box<dyn OrderPolicy>))
        .collect();
    let log = Simulation::new(agents, ConstantDemand::new(4), cfg)
        .unwrap()
        .run();

    for t in 3..10 {
        let produced = log.record(t - 3, Role::Factory).unwrap().placed_order;
        assert_eq!(log.record(t, Role::Factory).unwrap().received_shipment, produced);
    }
}

#[test]
fn stock_and_backlog_follow_the_flow_identities() {
    let cfg = SimulationConfig {
        random_seed: Some(99),
        initial_inventory: 5,
        ..config(40, 2, 2)
    };
    let log = noisy_run(&cfg);

    for role in Role::ALL {
        let mut inventory = cfg.initial_inventory;
        let mut backlog = 0u32;
        for record in log.for_role(role) {
            let available = inventory + record.received_shipment;
            let owed = record.incoming_order + backlog;
            assert_eq!(record.shipped, available.min(owed), "{record:?}");
            assert_eq!(record.inventory_on_hand, available - record.shipped);
            assert_eq!(record.backlog, owed - record.shipped);
            inventory = record.inventory_on_hand;
            backlog = record.backlog;
        }
    }
}

#[test]
fn log_is_period_major_in_chain_order() {
    let log = noisy_run(&config(7, 1, 2));
    assert_eq!(log.len(), 28);
    for (i, record) in log.records().iter().enumerate() {
        assert_eq!(record.period, i / 4);
        assert_eq!(record.role, Role::ALL[i % 4]);
    }
}

#[test]
fn identical_runs_produce_identical_bytes() {
    let cfg = SimulationConfig {
        random_seed: Some(7),
        information_sharing: bullwhip_sim::InformationSharing::Full,
        ..config(52, 2, 2)
    };

    let mut first = Vec::new();
    let mut second = Vec::new();
    let log_a = noisy_run(&cfg);
    let log_b = noisy_run(&cfg);
    write_run_log(&mut first, &log_a).unwrap();
    write_run_log(&mut second, &log_b).unwrap();

    assert_eq!(log_a, log_b);
    assert_eq!(first, second);
}

#[test]
fn independent_runs_can_execute_in_parallel() {
    let cfg = SimulationConfig {
        random_seed: Some(3),
        ..config(26, 1, 2)
    };
    let handles: Vec<_> = (0..2)
        .map(|_| {
            let cfg = cfg.clone();
            thread::spawn(move || noisy_run(&cfg))
        })
        .collect();
    let logs: Vec<RunLog> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(logs[0], logs[1]);
    assert_eq!(logs[0], noisy_run(&cfg));
}

#[test]
fn only_retailer_supplied_is_a_configuration_error() {
    let mut agents: HashMap<Role, Box<dyn OrderPolicy>> = HashMap::new();
    agents.insert(Role::Retailer, Box::new(OrderUpToPolicy::new(12)));

    match Simulation::new(agents, ConstantDemand::new(4), config(5, 1, 2)) {
        Err(SimulationError::MissingAgent(role)) => assert_eq!(role, Role::Wholesaler),
        Err(other) => panic!("unexpected error {other}"),
        Ok(_) => panic!("run built without a full chain"),
    }
}

#[test]
fn missing_factory_is_reported_by_name() {
    let mut agents = order_up_to_chain(12);
    agents.remove(&Role::Factory);
    let err = Simulation::new(agents, ConstantDemand::new(4), config(5, 1, 2))
        .err()
        .unwrap();
    assert_eq!(err.to_string(), "missing agent for role factory");
}

#[test]
fn negative_orders_are_clamped_and_reported() {
    let mut agents = order_up_to_chain(12);
    agents.insert(Role::Retailer, Box::new(ConstantPolicy(-5)));
    let log = Simulation::new(agents, ConstantDemand::new(4), config(6, 1, 2))
        .unwrap()
        .run();

    assert!(log.for_role(Role::Retailer).all(|r| r.placed_order == 0));
    assert_eq!(log.anomalies().len(), 6);
    for (period, anomaly) in log.anomalies().iter().enumerate() {
        assert_eq!(anomaly.period, period);
        assert_eq!(anomaly.role, Role::Retailer);
        assert_eq!(anomaly.requested, -5);
        assert_eq!(anomaly.applied, 0);
    }
}

#[test]
fn oversized_orders_are_clamped_and_reported() {
    let mut agents = order_up_to_chain(12);
    agents.insert(Role::Factory, Box::new(ConstantPolicy(i64::MAX)));
    let log = Simulation::new(agents, ConstantDemand::new(4), config(1, 1, 2))
        .unwrap()
        .run();

    assert_eq!(log.record(0, Role::Factory).unwrap().placed_order, u32::MAX);
    assert_eq!(log.anomalies().len(), 1);
    assert_eq!(log.anomalies()[0].applied, u32::MAX);
}

#[test]
fn well_behaved_policies_leave_no_anomalies() {
    let log = noisy_run(&config(40, 3, 1));
    assert!(log.anomalies().is_empty());
}
