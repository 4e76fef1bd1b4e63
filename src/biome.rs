//! Biome types, habitability, and the per-biome fodder regeneration rule.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ParameterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    Ocean,
    Mountain,
    Desert,
    Savannah,
    Jungle,
    /// Experimental amphibious zone. Parses from layouts but stays
    /// non-habitable until its rule is pinned down upstream.
    OutOfBounds,
}

impl Biome {
    pub fn from_code(code: char) -> Option<Biome> {
        match code {
            'O' => Some(Biome::Ocean),
            'M' => Some(Biome::Mountain),
            'D' => Some(Biome::Desert),
            'S' => Some(Biome::Savannah),
            'J' => Some(Biome::Jungle),
            'B' => Some(Biome::OutOfBounds),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Biome::Ocean => "Ocean",
            Biome::Mountain => "Mountain",
            Biome::Desert => "Desert",
            Biome::Savannah => "Savannah",
            Biome::Jungle => "Jungle",
            Biome::OutOfBounds => "OutOfBounds",
        }
    }

    pub fn is_habitable(self) -> bool {
        matches!(self, Biome::Desert | Biome::Savannah | Biome::Jungle)
    }

    /// Fodder level after one year of regrowth.
    pub fn regrow(self, fodder: f64, params: &BiomeParams) -> f64 {
        match self {
            Biome::Jungle => params.f_max_jungle,
            Biome::Savannah => fodder + params.alpha_savannah * (params.f_max_savannah - fodder),
            Biome::Desert | Biome::Ocean | Biome::Mountain | Biome::OutOfBounds => 0.0,
        }
    }

    /// Fodder present in a freshly built cell.
    pub fn initial_fodder(self, params: &BiomeParams) -> f64 {
        match self {
            Biome::Jungle => params.f_max_jungle,
            Biome::Savannah => params.f_max_savannah,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiomeParams {
    pub f_max_jungle: f64,
    pub f_max_savannah: f64,
    pub alpha_savannah: f64,
}

impl Default for BiomeParams {
    fn default() -> Self {
        Self {
            f_max_jungle: 800.0,
            f_max_savannah: 300.0,
            alpha_savannah: 0.3,
        }
    }
}

impl BiomeParams {
    /// Validates the whole override map before committing anything.
    pub fn apply_overrides(
        &mut self,
        biome: Biome,
        overrides: &BTreeMap<String, f64>,
    ) -> Result<(), ParameterError> {
        let mut updated = self.clone();
        for (key, value) in overrides {
            updated.apply(biome, key, *value)?;
        }
        *self = updated;
        Ok(())
    }

    fn apply(&mut self, biome: Biome, key: &str, value: f64) -> Result<(), ParameterError> {
        match (biome, key) {
            (Biome::Jungle, "f_max") => {
                if value < 0.0 {
                    return Err(out_of_domain(key, value, "must be non-negative"));
                }
                self.f_max_jungle = value;
            }
            (Biome::Savannah, "f_max") => {
                if value < 0.0 {
                    return Err(out_of_domain(key, value, "must be non-negative"));
                }
                self.f_max_savannah = value;
            }
            (Biome::Savannah, "alpha") => {
                if !(0.0..=1.0).contains(&value) {
                    return Err(out_of_domain(key, value, "must lie in [0, 1]"));
                }
                self.alpha_savannah = value;
            }
            _ => {
                return Err(ParameterError::UnknownKey {
                    target: biome.name(),
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }
}

fn out_of_domain(key: &str, value: f64, constraint: &'static str) -> ParameterError {
    ParameterError::OutOfDomain {
        key: key.to_string(),
        value,
        constraint,
    }
}
