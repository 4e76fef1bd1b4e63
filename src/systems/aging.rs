use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    island::Island,
    rng::SystemRng,
    species::Species,
};

/// Every animal ages one year and pays the annual weight loss. Newborn
/// flags drop here, so last year's newborns migrate like anyone else.
pub struct AgingSystem;

impl AgingSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AgingSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for AgingSystem {
    fn name(&self) -> &str {
        "aging"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        island: &mut Island,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        for coord in island.habitable_coords() {
            for species in Species::ALL {
                let params = ctx.params.species(species);
                for animal in island.cell_mut(coord).animals_mut(species) {
                    animal.age_one_cycle(params);
                    animal.lose_annual_weight(params);
                }
            }
        }
        Ok(())
    }
}
