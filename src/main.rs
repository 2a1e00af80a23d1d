use bullwhip_sim::io::demand::StepDemand;
use bullwhip_sim::io::reporting;
use bullwhip_sim::strategy::implementations::{
    InfoAwarePolicy, NaivePolicy, OrderUpToPolicy, SmoothingPolicy,
};
use bullwhip_sim::{OrderPolicy, Role, Simulation, SimulationConfig, SimulationError};
use std::env;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), SimulationError> {
    println!("=== Beer Distribution Game Simulation in Rust ===");

    // 1. SETUP CONFIGURATION
    // Optional first argument: path to a JSON config; missing fields take defaults.
    let mut args = env::args().skip(1);
    let config = match args.next() {
        Some(path) => SimulationConfig::from_json_file(path)?,
        None => SimulationConfig::default(),
    };
    let output_file = args
        .next()
        .unwrap_or_else(|| "simulation_results.csv".to_string());

    // 2. GENERATE DEMAND
    // The classic step: demand jumps from 4 to 8 at period 4.
    let demand = StepDemand::classic();

    // 3. DEFINE STRATEGIES
    // One agent per stage: Retailer -> Wholesaler -> Distributor -> Factory
    let target = config.initial_inventory;
    let agents: Vec<(Role, Box<dyn OrderPolicy>)> = vec![
        (Role::Retailer, Box::new(OrderUpToPolicy::new(target)) as Box<dyn OrderPolicy>),
        (Role::Wholesaler, Box::new(NaivePolicy::new()) as Box<dyn OrderPolicy>),
        (Role::Distributor, Box::new(SmoothingPolicy::new(target, 0.3, 4)) as Box<dyn OrderPolicy>),
        (Role::Factory, Box::new(InfoAwarePolicy::new(target, 0.3, 0.5, 3)) as Box<dyn OrderPolicy>),
    ];

    // 4. INITIALIZE AND RUN
    let periods = config.periods;
    let sim = Simulation::new(agents, demand, config)?;
    println!("Running simulation for {periods} periods...");
    let log = sim.run();

    // 5. EXPORT RESULTS
    reporting::write_run_log_to_path(&output_file, &log)?;
    println!("Data written to ./{output_file}");

    // 6. PRINT COST ANALYSIS
    println!("\n=== Cost Analysis ===");
    for (role, cost) in log.cost_breakdown() {
        println!("{role}: ${cost:.2}");
    }
    println!("Total Supply Chain Cost: ${:.2}", log.total_cost());
    if !log.anomalies().is_empty() {
        println!("Clamped orders: {}", log.anomalies().len());
    }

    println!("\nSimulation Complete.");
    Ok(())
}
