use anyhow::Result;
use rand::Rng;

use crate::{
    engine::{System, SystemContext},
    island::{Cell, Island},
    rng::SystemRng,
    species::{ParamTable, Species},
};

use super::{sort_by_ascending_fitness, sort_by_descending_fitness};

/// The within-cell feeding order: herbivores graze, carnivores hunt,
/// vultures scavenge what the hunt left behind.
pub struct FeedingSystem;

impl FeedingSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FeedingSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for FeedingSystem {
    fn name(&self) -> &str {
        "feeding"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        island: &mut Island,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        for coord in island.habitable_coords() {
            let cell = island.cell_mut(coord);
            graze(cell, ctx.params);
            hunt(cell, ctx.params, rng);
            scavenge(cell, ctx.params);
        }
        Ok(())
    }
}

/// Fittest herbivores feed first; partial portions once fodder runs low.
fn graze(cell: &mut Cell, params: &ParamTable) {
    let herbivore = params.species(Species::Herbivore);
    sort_by_descending_fitness(&mut cell.herbivores);
    for animal in &mut cell.herbivores {
        let intake = herbivore.f_appetite.min(cell.fodder);
        if intake <= 0.0 {
            break;
        }
        cell.fodder -= intake;
        animal.gain_weight(intake, herbivore);
    }
}

/// Fittest carnivores hunt first, targeting the weakest herbivores.
/// Kills are visible to later hunters in the same pass; uneaten carcass
/// mass feeds the carrion pool.
fn hunt(cell: &mut Cell, params: &ParamTable, rng: &mut SystemRng<'_>) {
    let carnivore = params.species(Species::Carnivore);
    let Some(delta_phi_max) = carnivore.delta_phi_max else {
        return;
    };
    if cell.carnivores.is_empty() {
        return;
    }

    sort_by_descending_fitness(&mut cell.carnivores);
    sort_by_ascending_fitness(&mut cell.herbivores);

    let mut killed = vec![false; cell.herbivores.len()];
    for hunter in &mut cell.carnivores {
        let mut appetite = carnivore.f_appetite;
        for (index, prey) in cell.herbivores.iter().enumerate() {
            if appetite <= 0.0 {
                break;
            }
            if killed[index] {
                continue;
            }
            let advantage = hunter.phi - prey.phi;
            let probability = if advantage <= 0.0 {
                0.0
            } else if advantage >= delta_phi_max {
                1.0
            } else {
                advantage / delta_phi_max
            };
            if rng.gen::<f64>() < probability {
                killed[index] = true;
                let eaten = appetite.min(prey.weight);
                appetite -= eaten;
                hunter.gain_weight(eaten, carnivore);
                cell.carrion += prey.weight - eaten;
            }
        }
    }

    let mut index = 0;
    cell.herbivores.retain(|_| {
        let keep = !killed[index];
        index += 1;
        keep
    });
}

/// Vultures consume carrion with no predation risk.
fn scavenge(cell: &mut Cell, params: &ParamTable) {
    let vulture = params.species(Species::Vulture);
    sort_by_descending_fitness(&mut cell.vultures);
    for animal in &mut cell.vultures {
        let intake = vulture.f_appetite.min(cell.carrion);
        if intake <= 0.0 {
            break;
        }
        cell.carrion -= intake;
        animal.gain_weight(intake, vulture);
    }
}
