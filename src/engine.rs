//! The simulation engine: a fixed-order scheduler of annual-cycle phases
//! over one island, with deterministic per-phase RNG streams and periodic
//! census output.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, info};

use crate::biome::Biome;
use crate::census::CensusWriter;
use crate::error::ParameterError;
use crate::island::Island;
use crate::rng::{RngManager, SystemRng};
use crate::species::{ParamTable, Species};
use crate::systems::{
    AgingSystem, DeathSystem, FeedingSystem, MigrationSystem, ProcreationSystem,
    RegenerationSystem,
};

pub struct EngineSettings {
    pub scenario_name: String,
    pub seed: u64,
    pub census_interval_years: u64,
    pub census_dir: PathBuf,
}

/// Read-only context handed to every phase.
pub struct SystemContext<'a> {
    pub year: u64,
    pub scenario_name: &'a str,
    pub params: &'a ParamTable,
}

/// One phase of the annual cycle. Phases run in the order they were
/// registered, once per simulated year.
pub trait System {
    fn name(&self) -> &str;
    fn run(
        &mut self,
        ctx: &SystemContext,
        island: &mut Island,
        rng: &mut SystemRng<'_>,
    ) -> Result<()>;
}

pub struct EngineBuilder {
    settings: EngineSettings,
    params: ParamTable,
    systems: Vec<Box<dyn System>>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            params: ParamTable::default(),
            systems: Vec::new(),
        }
    }

    /// The full annual cycle in its mandated order: regeneration,
    /// feeding, procreation, migration, aging, death.
    pub fn annual_cycle(settings: EngineSettings) -> Self {
        Self::new(settings)
            .with_system(RegenerationSystem::new())
            .with_system(FeedingSystem::new())
            .with_system(ProcreationSystem::new())
            .with_system(MigrationSystem::new())
            .with_system(AgingSystem::new())
            .with_system(DeathSystem::new())
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn with_params(mut self, params: ParamTable) -> Self {
        self.params = params;
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            rng: RngManager::new(self.settings.seed),
            systems: self.systems,
            census_writer: CensusWriter::new(
                self.settings.census_dir.clone(),
                self.settings.census_interval_years,
            ),
            params: self.params,
            settings: self.settings,
            year: 0,
        }
    }
}

pub struct Engine {
    rng: RngManager,
    systems: Vec<Box<dyn System>>,
    census_writer: CensusWriter,
    settings: EngineSettings,
    params: ParamTable,
    year: u64,
}

impl Engine {
    /// Executes one full annual cycle. The cycle itself cannot fail on
    /// valid state; errors only surface from census output.
    pub fn advance_year(&mut self, island: &mut Island) -> Result<()> {
        self.year += 1;
        let year = self.year;
        for system in &mut self.systems {
            debug!(system = system.name(), year, "running phase");
            let mut rng = self.rng.stream(system.name());
            let ctx = SystemContext {
                year,
                scenario_name: &self.settings.scenario_name,
                params: &self.params,
            };
            system.run(&ctx, island, &mut rng)?;
        }
        self.census_writer
            .maybe_write(year, &self.settings.scenario_name, island)?;
        Ok(())
    }

    pub fn run(&mut self, island: &mut Island, years: u64) -> Result<()> {
        for _ in 0..years {
            self.advance_year(island)?;
        }
        let census = island.census();
        info!(
            scenario = %self.settings.scenario_name,
            year = self.year,
            herbivores = census.herbivores,
            carnivores = census.carnivores,
            vultures = census.vultures,
            "simulation advanced"
        );
        Ok(())
    }

    pub fn year(&self) -> u64 {
        self.year
    }

    pub fn params(&self) -> &ParamTable {
        &self.params
    }

    /// Validated, process-wide override of a species parameter table.
    /// Takes effect from the next cycle onward.
    pub fn override_species_parameters(
        &mut self,
        species: Species,
        overrides: &BTreeMap<String, f64>,
    ) -> Result<(), ParameterError> {
        self.params.override_species(species, overrides)
    }

    pub fn override_biome_parameters(
        &mut self,
        biome: Biome,
        overrides: &BTreeMap<String, f64>,
    ) -> Result<(), ParameterError> {
        self.params.override_biome(biome, overrides)
    }
}
