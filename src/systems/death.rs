use anyhow::Result;
use rand::Rng;

use crate::{
    engine::{System, SystemContext},
    island::Island,
    rng::SystemRng,
    species::Species,
};

/// End-of-year mortality. Animals at zero weight or below die outright;
/// everyone else faces an omega * (1 - phi) draw.
pub struct DeathSystem;

impl DeathSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DeathSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for DeathSystem {
    fn name(&self) -> &str {
        "death"
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
                let animals = island.cell_mut(coord).animals_mut(species);
                animals.retain(|animal| !animal.certain_death());
                animals.retain(|animal| rng.gen::<f64>() >= animal.death_probability(params));
            }
        }
        Ok(())
    }
}
