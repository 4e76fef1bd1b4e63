//! Periodic census output: per-species totals plus the per-cell
//! distribution, written as JSON at a configurable year interval.

use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

use crate::island::{Census, Coord, Island};

#[derive(Debug, Clone, Serialize)]
pub struct CensusReport {
    pub scenario: String,
    pub year: u64,
    pub timestamp: String,
    pub totals: Census,
    pub cells: Vec<CellCensus>,
}

/// One occupied cell. Empty cells are omitted to keep reports small on
/// mostly-ocean maps.
#[derive(Debug, Clone, Serialize)]
pub struct CellCensus {
    pub location: Coord,
    pub biome: &'static str,
    pub herbivores: usize,
    pub carnivores: usize,
    pub vultures: usize,
}

pub struct CensusWriter {
    output_dir: PathBuf,
    interval_years: u64,
}

impl CensusWriter {
    pub fn new(output_dir: PathBuf, interval_years: u64) -> Self {
        Self {
            output_dir,
            interval_years,
        }
    }

    /// An interval of zero disables output entirely.
    pub fn due(&self, year: u64) -> bool {
        self.interval_years > 0 && year > 0 && year % self.interval_years == 0
    }

    /// Writes a report if one is due this year. Returns the path written,
    /// or None when the year is off-interval.
    pub fn maybe_write(
        &self,
        year: u64,
        scenario: &str,
        island: &Island,
    ) -> Result<Option<PathBuf>> {
        if !self.due(year) {
            return Ok(None);
        }
        let report = build_report(year, scenario, island);

        fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("creating census dir {}", self.output_dir.display()))?;
        let path = self.output_dir.join(format!("census_{year:06}.json"));
        let json = serde_json::to_string_pretty(&report)?;
        let mut file =
            File::create(&path).with_context(|| format!("creating {}", path.display()))?;
        file.write_all(json.as_bytes())?;

        debug!(year, path = %path.display(), "census written");
        Ok(Some(path))
    }
}

fn build_report(year: u64, scenario: &str, island: &Island) -> CensusReport {
    let mut cells = Vec::new();
    for coord in island.coords() {
        let cell = island.cell(coord);
        if cell.population() == 0 {
            continue;
        }
        cells.push(CellCensus {
            location: coord,
            biome: cell.biome.name(),
            herbivores: cell.herbivores.len(),
            carnivores: cell.carnivores.len(),
            vultures: cell.vultures.len(),
        });
    }
    CensusReport {
        scenario: scenario.to_string(),
        year,
        timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        totals: island.census(),
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animal::Animal;
    use crate::species::{ParamTable, Species};

    #[test]
    fn interval_gating() {
        let writer = CensusWriter::new(PathBuf::from("unused"), 10);
        assert!(!writer.due(0));
        assert!(!writer.due(9));
        assert!(writer.due(10));
        assert!(!writer.due(11));
        assert!(writer.due(20));

        let disabled = CensusWriter::new(PathBuf::from("unused"), 0);
        assert!(!disabled.due(10));
    }

    #[test]
    fn writes_report_with_occupied_cells_only() {
        let dir = tempfile::tempdir().unwrap();
        let writer = CensusWriter::new(dir.path().to_path_buf(), 5);

        let mut island = Island::from_layout("OOOO\nOJSO\nOOOO").unwrap();
        let params = ParamTable::default();
        let herbivore = params.species(Species::Herbivore).clone();
        island
            .cell_mut(Coord::new(1, 1))
            .herbivores
            .push(Animal::new(Species::Herbivore, 5, 20.0, &herbivore));

        assert!(writer.maybe_write(4, "test", &island).unwrap().is_none());
        let path = writer
            .maybe_write(5, "test", &island)
            .unwrap()
            .expect("report due at year 5");
        assert!(path.exists());

        let contents = std::fs::read_to_string(&path).unwrap();
        let report: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(report["year"], 5);
        assert_eq!(report["scenario"], "test");
        assert_eq!(report["totals"]["herbivores"], 1);
        assert_eq!(report["cells"].as_array().unwrap().len(), 1);
        assert_eq!(report["cells"][0]["biome"], "Jungle");
    }
}
