use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use rossoya::{
    engine::{EngineBuilder, EngineSettings},
    scenario::ScenarioLoader,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Rossoya island ecosystem simulator")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/rossoya.yaml")]
    scenario: PathBuf,

    /// Override simulated years (uses scenario default when omitted)
    #[arg(long)]
    years: Option<u64>,

    /// Override census interval in years
    #[arg(long)]
    census_interval: Option<u64>,

    /// Directory for census reports
    #[arg(long)]
    census_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let scenario = loader.load(&cli.scenario)?;
    let params = scenario.build_params()?;
    let mut island = scenario.build_island(&params)?;
    let years = scenario.years(cli.years);
    let census_interval = cli
        .census_interval
        .unwrap_or(scenario.census_interval_years);
    let census_dir = cli.census_dir.unwrap_or_else(|| PathBuf::from("census"));

    let settings = EngineSettings {
        scenario_name: scenario.name.clone(),
        seed: scenario.seed,
        census_interval_years: census_interval,
        census_dir,
    };

    let mut engine = EngineBuilder::annual_cycle(settings)
        .with_params(params)
        .build();

    engine.run(&mut island, years)?;
    let census = island.census();
    println!(
        "Scenario '{}' completed after {} years. Herbivores: {}, carnivores: {}, vultures: {}.",
        scenario.name, years, census.herbivores, census.carnivores, census.vultures
    );
    Ok(())
}
