use std::collections::BTreeMap;
use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::biome::Biome;
use crate::island::{Island, PopulationEntry};
use crate::species::{ParamTable, Species};

fn default_years() -> u64 {
    100
}

fn default_census_interval_years() -> u64 {
    10
}

/// A complete simulation setup loaded from YAML: the map, the seed
/// populations, and any parameter overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    pub seed: u64,
    #[serde(default = "default_years")]
    pub years: u64,
    #[serde(default = "default_census_interval_years")]
    pub census_interval_years: u64,
    /// Multiline biome-code layout, one row per line.
    pub map: String,
    #[serde(default)]
    pub populations: Vec<PopulationEntry>,
    #[serde(default)]
    pub species_overrides: BTreeMap<String, BTreeMap<String, f64>>,
    #[serde(default)]
    pub biome_overrides: BTreeMap<String, BTreeMap<String, f64>>,
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(scenario)
    }
}

impl Scenario {
    /// Applies species and biome overrides onto a fresh parameter table.
    /// Overrides are validated as a whole; one bad key rejects the table.
    pub fn build_params(&self) -> Result<ParamTable> {
        let mut params = ParamTable::default();
        for (name, overrides) in &self.species_overrides {
            let species = Species::from_name(name)
                .with_context(|| format!("Unknown species {name:?} in overrides"))?;
            params
                .override_species(species, overrides)
                .with_context(|| format!("Invalid override for {name}"))?;
        }
        for (name, overrides) in &self.biome_overrides {
            let biome = biome_from_name(name)
                .with_context(|| format!("Unknown biome {name:?} in overrides"))?;
            params
                .override_biome(biome, overrides)
                .with_context(|| format!("Invalid override for {name}"))?;
        }
        Ok(params)
    }

    /// Parses the map and inserts the seed populations.
    pub fn build_island(&self, params: &ParamTable) -> Result<Island> {
        let mut island = Island::from_layout_with(&self.map, params.biomes())
            .with_context(|| format!("Invalid map in scenario {:?}", self.name))?;
        island
            .insert_population(&self.populations, params)
            .with_context(|| format!("Invalid population in scenario {:?}", self.name))?;
        Ok(island)
    }

    pub fn years(&self, override_years: Option<u64>) -> u64 {
        override_years.unwrap_or(self.years)
    }
}

fn biome_from_name(name: &str) -> Option<Biome> {
    match name {
        "Ocean" => Some(Biome::Ocean),
        "Mountain" => Some(Biome::Mountain),
        "Desert" => Some(Biome::Desert),
        "Savannah" => Some(Biome::Savannah),
        "Jungle" => Some(Biome::Jungle),
        "OutOfBounds" => Some(Biome::OutOfBounds),
        _ => None,
    }
}
