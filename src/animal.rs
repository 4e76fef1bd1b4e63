//! Per-individual state and the pure pieces of the life-cycle math.
//!
//! All mutations recompute the cached fitness, so `phi` is always in sync
//! with age and weight.

use serde::{Deserialize, Serialize};

use crate::species::{Species, SpeciesParams};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animal {
    pub species: Species,
    pub age: u32,
    pub weight: f64,
    /// Cached fitness, recomputed on every age or weight change.
    pub phi: f64,
    /// Set at birth, cleared by the aging phase. A newborn does not
    /// migrate in its birth year.
    pub newborn: bool,
}

impl Animal {
    pub fn new(species: Species, age: u32, weight: f64, params: &SpeciesParams) -> Self {
        Self {
            species,
            age,
            weight,
            phi: params.fitness(age, weight),
            newborn: false,
        }
    }

    pub fn birth(species: Species, weight: f64, params: &SpeciesParams) -> Self {
        let mut animal = Self::new(species, 0, weight, params);
        animal.newborn = true;
        animal
    }

    /// Weight gained from eating is the intake scaled by beta.
    pub fn gain_weight(&mut self, intake: f64, params: &SpeciesParams) {
        self.weight += intake * params.beta;
        self.phi = params.fitness(self.age, self.weight);
    }

    pub fn lose_annual_weight(&mut self, params: &SpeciesParams) {
        self.weight -= self.weight * params.eta;
        self.phi = params.fitness(self.age, self.weight);
    }

    pub fn age_one_cycle(&mut self, params: &SpeciesParams) {
        self.age += 1;
        self.newborn = false;
        self.phi = params.fitness(self.age, self.weight);
    }

    /// Weight spent delivering a newborn.
    pub fn lose_birth_weight(&mut self, amount: f64, params: &SpeciesParams) {
        self.weight -= amount;
        self.phi = params.fitness(self.age, self.weight);
    }

    /// Starvation check, applied before any probabilistic death draw.
    pub fn certain_death(&self) -> bool {
        self.weight <= 0.0
    }

    /// Probability of dying this cycle.
    pub fn death_probability(&self, params: &SpeciesParams) -> f64 {
        params.omega * (1.0 - self.phi)
    }

    /// Probability of attempting migration this cycle.
    pub fn migration_probability(&self, params: &SpeciesParams) -> f64 {
        params.mu * self.phi
    }
}
