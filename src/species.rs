//! Species tags and the per-species parameter tables that drive every
//! probabilistic rule in the annual cycle.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::biome::{Biome, BiomeParams};
use crate::error::ParameterError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Species {
    Herbivore,
    Carnivore,
    Vulture,
}

impl Species {
    /// Deterministic processing order within a cell.
    pub const ALL: [Species; 3] = [Species::Herbivore, Species::Carnivore, Species::Vulture];

    pub fn from_name(name: &str) -> Option<Species> {
        match name {
            "Herbivore" => Some(Species::Herbivore),
            "Carnivore" => Some(Species::Carnivore),
            "Vulture" => Some(Species::Vulture),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Species::Herbivore => "Herbivore",
            Species::Carnivore => "Carnivore",
            Species::Vulture => "Vulture",
        }
    }
}

/// Immutable per-species constants. Overrides go through [`ParamTable`]
/// and affect all future computations for the species.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesParams {
    pub w_birth: f64,
    pub sigma_birth: f64,
    pub beta: f64,
    pub eta: f64,
    pub a_half: f64,
    pub phi_age: f64,
    pub w_half: f64,
    pub phi_weight: f64,
    pub mu: f64,
    pub lambda: f64,
    pub gamma: f64,
    pub zeta: f64,
    pub xi: f64,
    pub omega: f64,
    pub f_appetite: f64,
    /// Kill threshold, carnivore only.
    pub delta_phi_max: Option<f64>,
}

impl SpeciesParams {
    pub fn herbivore() -> Self {
        Self {
            w_birth: 8.0,
            sigma_birth: 1.5,
            beta: 0.9,
            eta: 0.05,
            a_half: 40.0,
            phi_age: 0.2,
            w_half: 10.0,
            phi_weight: 0.1,
            mu: 0.25,
            lambda: 1.0,
            gamma: 0.2,
            zeta: 3.5,
            xi: 1.2,
            omega: 0.4,
            f_appetite: 10.0,
            delta_phi_max: None,
        }
    }

    pub fn carnivore() -> Self {
        Self {
            w_birth: 6.0,
            sigma_birth: 1.0,
            beta: 0.75,
            eta: 0.125,
            a_half: 60.0,
            phi_age: 0.4,
            w_half: 4.0,
            phi_weight: 0.4,
            mu: 0.4,
            lambda: 1.0,
            gamma: 0.8,
            zeta: 3.5,
            xi: 1.1,
            omega: 0.9,
            f_appetite: 50.0,
            delta_phi_max: Some(10.0),
        }
    }

    pub fn vulture() -> Self {
        Self {
            w_birth: 5.0,
            sigma_birth: 0.8,
            beta: 0.75,
            eta: 0.1,
            a_half: 70.0,
            phi_age: 0.35,
            w_half: 3.5,
            phi_weight: 0.35,
            mu: 0.5,
            lambda: 1.0,
            gamma: 0.6,
            zeta: 3.5,
            xi: 1.1,
            omega: 0.6,
            f_appetite: 30.0,
            delta_phi_max: None,
        }
    }

    pub fn defaults_for(species: Species) -> Self {
        match species {
            Species::Herbivore => Self::herbivore(),
            Species::Carnivore => Self::carnivore(),
            Species::Vulture => Self::vulture(),
        }
    }

    /// Minimum weight at which an animal may give birth.
    pub fn birth_weight_threshold(&self) -> f64 {
        self.zeta * (self.w_birth + self.sigma_birth)
    }

    /// Logistic fitness in [0, 1]. Zero once the weight is gone.
    pub fn fitness(&self, age: u32, weight: f64) -> f64 {
        if weight <= 0.0 {
            return 0.0;
        }
        let q_age = 1.0 / (1.0 + (self.phi_age * (age as f64 - self.a_half)).exp());
        let q_weight = 1.0 / (1.0 + (-self.phi_weight * (weight - self.w_half)).exp());
        q_age * q_weight
    }

    fn apply(&mut self, species: Species, key: &str, value: f64) -> Result<(), ParameterError> {
        let non_negative = |key: &str| -> Result<(), ParameterError> {
            if value < 0.0 {
                Err(ParameterError::OutOfDomain {
                    key: key.to_string(),
                    value,
                    constraint: "must be non-negative",
                })
            } else {
                Ok(())
            }
        };

        match key {
            "w_birth" => {
                non_negative(key)?;
                self.w_birth = value;
            }
            "sigma_birth" => {
                non_negative(key)?;
                self.sigma_birth = value;
            }
            "beta" => {
                non_negative(key)?;
                self.beta = value;
            }
            "eta" => {
                if !(0.0..=1.0).contains(&value) {
                    return Err(ParameterError::OutOfDomain {
                        key: key.to_string(),
                        value,
                        constraint: "must lie in [0, 1]",
                    });
                }
                self.eta = value;
            }
            "a_half" => {
                non_negative(key)?;
                self.a_half = value;
            }
            "phi_age" => {
                non_negative(key)?;
                self.phi_age = value;
            }
            "w_half" => {
                non_negative(key)?;
                self.w_half = value;
            }
            "phi_weight" => {
                non_negative(key)?;
                self.phi_weight = value;
            }
            "mu" => {
                non_negative(key)?;
                self.mu = value;
            }
            "lambda" => {
                non_negative(key)?;
                self.lambda = value;
            }
            "gamma" => {
                non_negative(key)?;
                self.gamma = value;
            }
            "zeta" => {
                non_negative(key)?;
                self.zeta = value;
            }
            "xi" => {
                non_negative(key)?;
                self.xi = value;
            }
            "omega" => {
                non_negative(key)?;
                self.omega = value;
            }
            "F" => {
                non_negative(key)?;
                self.f_appetite = value;
            }
            "DeltaPhiMax" => {
                if species != Species::Carnivore {
                    return Err(ParameterError::UnknownKey {
                        target: species.name(),
                        key: key.to_string(),
                    });
                }
                if value <= 0.0 {
                    return Err(ParameterError::OutOfDomain {
                        key: key.to_string(),
                        value,
                        constraint: "must be strictly positive",
                    });
                }
                self.delta_phi_max = Some(value);
            }
            _ => {
                return Err(ParameterError::UnknownKey {
                    target: species.name(),
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// The full parameter table threaded through the engine. Constructed once,
/// mutated only by validated overrides.
#[derive(Debug, Clone)]
pub struct ParamTable {
    herbivore: SpeciesParams,
    carnivore: SpeciesParams,
    vulture: SpeciesParams,
    biomes: BiomeParams,
}

impl Default for ParamTable {
    fn default() -> Self {
        Self {
            herbivore: SpeciesParams::herbivore(),
            carnivore: SpeciesParams::carnivore(),
            vulture: SpeciesParams::vulture(),
            biomes: BiomeParams::default(),
        }
    }
}

impl ParamTable {
    pub fn species(&self, species: Species) -> &SpeciesParams {
        match species {
            Species::Herbivore => &self.herbivore,
            Species::Carnivore => &self.carnivore,
            Species::Vulture => &self.vulture,
        }
    }

    pub fn biomes(&self) -> &BiomeParams {
        &self.biomes
    }

    /// Validates every key and value before committing, so a failed
    /// override leaves the table untouched.
    pub fn override_species(
        &mut self,
        species: Species,
        overrides: &BTreeMap<String, f64>,
    ) -> Result<(), ParameterError> {
        let mut updated = self.species(species).clone();
        for (key, value) in overrides {
            updated.apply(species, key, *value)?;
        }
        match species {
            Species::Herbivore => self.herbivore = updated,
            Species::Carnivore => self.carnivore = updated,
            Species::Vulture => self.vulture = updated,
        }
        Ok(())
    }

    pub fn override_biome(
        &mut self,
        biome: Biome,
        overrides: &BTreeMap<String, f64>,
    ) -> Result<(), ParameterError> {
        self.biomes.apply_overrides(biome, overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fitness_stays_in_unit_interval() {
        let params = SpeciesParams::herbivore();
        for age in [0_u32, 5, 40, 200] {
            for weight in [0.1, 5.0, 10.0, 80.0, 1000.0] {
                let phi = params.fitness(age, weight);
                assert!((0.0..=1.0).contains(&phi), "phi {phi} out of range");
            }
        }
    }

    #[test]
    fn fitness_zero_at_non_positive_weight() {
        let params = SpeciesParams::herbivore();
        assert_eq!(params.fitness(3, 0.0), 0.0);
        assert_eq!(params.fitness(3, -2.5), 0.0);
    }

    #[test]
    fn fitness_monotone_in_weight() {
        let params = SpeciesParams::herbivore();
        let mut previous = 0.0;
        for weight in 1..200 {
            let phi = params.fitness(10, weight as f64);
            assert!(phi >= previous, "fitness dropped at weight {weight}");
            previous = phi;
        }
    }

    #[test]
    fn override_updates_value() {
        let mut table = ParamTable::default();
        let overrides = BTreeMap::from([("F".to_string(), 25.0)]);
        table
            .override_species(Species::Herbivore, &overrides)
            .unwrap();
        assert_eq!(table.species(Species::Herbivore).f_appetite, 25.0);
    }

    #[test]
    fn unknown_key_rejected_without_mutation() {
        let mut table = ParamTable::default();
        let overrides = BTreeMap::from([("beta".to_string(), 0.5), ("wingspan".to_string(), 2.0)]);
        let err = table
            .override_species(Species::Herbivore, &overrides)
            .unwrap_err();
        assert!(matches!(err, ParameterError::UnknownKey { .. }));
        assert_eq!(table.species(Species::Herbivore).beta, 0.9);
    }

    #[test]
    fn delta_phi_max_is_carnivore_only() {
        let mut table = ParamTable::default();
        let overrides = BTreeMap::from([("DeltaPhiMax".to_string(), 5.0)]);
        assert!(table
            .override_species(Species::Herbivore, &overrides)
            .is_err());
        table
            .override_species(Species::Carnivore, &overrides)
            .unwrap();
        assert_eq!(table.species(Species::Carnivore).delta_phi_max, Some(5.0));
    }

    #[test]
    fn delta_phi_max_must_be_positive() {
        let mut table = ParamTable::default();
        let overrides = BTreeMap::from([("DeltaPhiMax".to_string(), 0.0)]);
        let err = table
            .override_species(Species::Carnivore, &overrides)
            .unwrap_err();
        assert!(matches!(err, ParameterError::OutOfDomain { .. }));
    }

    #[test]
    fn eta_above_one_rejected() {
        let mut table = ParamTable::default();
        let overrides = BTreeMap::from([("eta".to_string(), 1.5)]);
        assert!(table
            .override_species(Species::Carnivore, &overrides)
            .is_err());
    }
}
