use anyhow::Result;
use rand::Rng;

use crate::{
    engine::{System, SystemContext},
    island::{Cell, Coord, Island},
    rng::SystemRng,
    species::{Species, SpeciesParams},
};

/// Grid-wide relocation pass. All decisions are taken against the
/// pre-migration island and applied afterwards, so moves are simultaneous
/// and every animal moves at most once per year.
pub struct MigrationSystem;

impl MigrationSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MigrationSystem {
    fn default() -> Self {
        Self::new()
    }
}

struct Move {
    from: Coord,
    to: Coord,
    species: Species,
    index: usize,
}

impl System for MigrationSystem {
    fn name(&self) -> &str {
        "migration"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        island: &mut Island,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        // Decision pass over the untouched grid, in row-major cell order,
        // species order, insertion order.
        let mut moves: Vec<Move> = Vec::new();
        for coord in island.habitable_coords() {
            for species in Species::ALL {
                let params = ctx.params.species(species);
                for (index, animal) in island.cell(coord).animals(species).iter().enumerate() {
                    if animal.newborn {
                        continue;
                    }
                    if rng.gen::<f64>() >= animal.migration_probability(params) {
                        continue;
                    }
                    if let Some(to) = choose_target(island, coord, species, params, rng) {
                        moves.push(Move {
                            from: coord,
                            to,
                            species,
                            index,
                        });
                    }
                }
            }
        }

        // Apply pass. Indices within one source list were recorded in
        // ascending order, so removing in reverse keeps them valid.
        let mut relocated = Vec::with_capacity(moves.len());
        for movement in moves.iter().rev() {
            let animal = island
                .cell_mut(movement.from)
                .animals_mut(movement.species)
                .remove(movement.index);
            relocated.push((movement.to, movement.species, animal));
        }
        for (to, species, animal) in relocated.into_iter().rev() {
            island.cell_mut(to).animals_mut(species).push(animal);
        }
        Ok(())
    }
}

/// Picks among habitable orthogonal neighbors with probability
/// proportional to exp(lambda * relative abundance). Returns None when no
/// neighbor is habitable.
fn choose_target(
    island: &Island,
    from: Coord,
    species: Species,
    params: &SpeciesParams,
    rng: &mut SystemRng<'_>,
) -> Option<Coord> {
    let mut weighted: Vec<(Coord, f64)> = Vec::with_capacity(4);
    let mut total = 0.0;
    for neighbor in island.neighbors(from) {
        let cell = island.cell(neighbor);
        if !cell.biome.is_habitable() {
            continue;
        }
        let propensity = (params.lambda * relative_abundance(cell, species, params)).exp();
        total += propensity;
        weighted.push((neighbor, propensity));
    }
    if weighted.is_empty() || total <= 0.0 {
        return None;
    }

    let mut draw = rng.gen::<f64>() * total;
    for (coord, propensity) in &weighted {
        draw -= propensity;
        if draw <= 0.0 {
            return Some(*coord);
        }
    }
    weighted.last().map(|(coord, _)| *coord)
}

/// Food available per same-species competitor: fodder for herbivores,
/// live herbivore weight for carnivores, carrion for vultures.
fn relative_abundance(cell: &Cell, species: Species, params: &SpeciesParams) -> f64 {
    if params.f_appetite <= 0.0 {
        return 0.0;
    }
    let food = match species {
        Species::Herbivore => cell.fodder,
        Species::Carnivore => cell.total_herbivore_weight(),
        Species::Vulture => cell.carrion,
    };
    food / ((cell.count(species) as f64 + 1.0) * params.f_appetite)
}
