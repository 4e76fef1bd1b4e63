use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    island::Island,
    rng::SystemRng,
};

/// Resets fodder per biome rule and clears last year's carrion.
pub struct RegenerationSystem;

impl RegenerationSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RegenerationSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for RegenerationSystem {
    fn name(&self) -> &str {
        "regeneration"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        island: &mut Island,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let biomes = ctx.params.biomes();
        let coords: Vec<_> = island.coords().collect();
        for coord in coords {
            let cell = island.cell_mut(coord);
            cell.fodder = cell.biome.regrow(cell.fodder, biomes);
            cell.carrion = 0.0;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SystemContext;
    use crate::island::Coord;
    use crate::rng::RngManager;
    use crate::species::ParamTable;

    #[test]
    fn regrows_fodder_and_clears_carrion() {
        let mut island = Island::from_layout("OOOO\nOJSO\nOOOO").unwrap();
        island.cell_mut(Coord::new(1, 1)).fodder = 15.0;
        island.cell_mut(Coord::new(1, 1)).carrion = 30.0;
        island.cell_mut(Coord::new(1, 2)).fodder = 100.0;

        let params = ParamTable::default();
        let ctx = SystemContext {
            year: 1,
            scenario_name: "test",
            params: &params,
        };
        let mut rng_manager = RngManager::new(1);
        RegenerationSystem::new()
            .run(&ctx, &mut island, &mut rng_manager.stream("regeneration"))
            .unwrap();

        assert_eq!(island.cell(Coord::new(1, 1)).fodder, 800.0);
        assert_eq!(island.cell(Coord::new(1, 1)).carrion, 0.0);
        assert!((island.cell(Coord::new(1, 2)).fodder - 160.0).abs() < 1e-9);
    }
}
