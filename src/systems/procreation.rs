use anyhow::{Context, Result};
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::{
    animal::Animal,
    engine::{System, SystemContext},
    island::Island,
    rng::SystemRng,
    species::Species,
};

/// Births per cell and species. The same-species count is fixed at phase
/// start, and newborns join the cell only after the full pass, so they
/// never breed in their birth year.
pub struct ProcreationSystem;

impl ProcreationSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProcreationSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for ProcreationSystem {
    fn name(&self) -> &str {
        "procreation"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        island: &mut Island,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        for coord in island.habitable_coords() {
            for species in Species::ALL {
                let params = ctx.params.species(species);
                let cell = island.cell_mut(coord);
                let count = cell.count(species);
                if count < 2 {
                    continue;
                }

                let birth_weights = Normal::new(params.w_birth, params.sigma_birth)
                    .context("birth weight distribution")?;
                let threshold = params.birth_weight_threshold();
                let mut newborns: Vec<Animal> = Vec::new();

                for parent in cell.animals_mut(species).iter_mut() {
                    if parent.weight < threshold {
                        continue;
                    }
                    let probability =
                        (params.gamma * parent.phi * (count as f64 - 1.0)).min(1.0);
                    if rng.gen::<f64>() >= probability {
                        continue;
                    }
                    // Truncated at zero; the draw itself is clamped, never an error.
                    let birth_weight = birth_weights.sample(&mut *rng).max(0.0);
                    let cost = params.xi * birth_weight;
                    if parent.weight - cost < 0.0 {
                        // Birth aborted, parent unchanged.
                        continue;
                    }
                    parent.lose_birth_weight(cost, params);
                    newborns.push(Animal::birth(species, birth_weight, params));
                }

                cell.animals_mut(species).append(&mut newborns);
            }
        }
        Ok(())
    }
}
