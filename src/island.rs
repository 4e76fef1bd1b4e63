//! The island grid: layout parsing, cells, neighbor lookup, population
//! insertion, and the census.

use serde::{Deserialize, Serialize};

use crate::animal::Animal;
use crate::biome::{Biome, BiomeParams};
use crate::error::{LayoutError, ValidationError};
use crate::species::{ParamTable, Species};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// One grid position. Residents are grouped by species so each cycle
/// phase can process them in a fixed order.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub biome: Biome,
    pub fodder: f64,
    /// Carcass biomass left by this year's kills, scavenged by vultures.
    pub carrion: f64,
    pub herbivores: Vec<Animal>,
    pub carnivores: Vec<Animal>,
    pub vultures: Vec<Animal>,
}

impl Cell {
    fn new(biome: Biome, fodder: f64) -> Self {
        Self {
            biome,
            fodder,
            carrion: 0.0,
            herbivores: Vec::new(),
            carnivores: Vec::new(),
            vultures: Vec::new(),
        }
    }

    pub fn animals(&self, species: Species) -> &Vec<Animal> {
        match species {
            Species::Herbivore => &self.herbivores,
            Species::Carnivore => &self.carnivores,
            Species::Vulture => &self.vultures,
        }
    }

    pub fn animals_mut(&mut self, species: Species) -> &mut Vec<Animal> {
        match species {
            Species::Herbivore => &mut self.herbivores,
            Species::Carnivore => &mut self.carnivores,
            Species::Vulture => &mut self.vultures,
        }
    }

    pub fn count(&self, species: Species) -> usize {
        self.animals(species).len()
    }

    pub fn population(&self) -> usize {
        self.herbivores.len() + self.carnivores.len() + self.vultures.len()
    }

    pub fn total_herbivore_weight(&self) -> f64 {
        self.herbivores.iter().map(|animal| animal.weight).sum()
    }
}

/// One batch entry for [`Island::insert_population`]. Species stays a
/// string here so an unknown name surfaces as a validation error rather
/// than a parse failure.
#[derive(Debug, Clone, Deserialize)]
pub struct PopulationEntry {
    pub location: Coord,
    pub animals: Vec<AnimalSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnimalSpec {
    pub species: String,
    pub age: i64,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Census {
    pub herbivores: usize,
    pub carnivores: usize,
    pub vultures: usize,
    pub total: usize,
}

impl Census {
    pub fn count(&self, species: Species) -> usize {
        match species {
            Species::Herbivore => self.herbivores,
            Species::Carnivore => self.carnivores,
            Species::Vulture => self.vultures,
        }
    }
}

/// Row-major grid of cells. Shape is fixed at construction; contents
/// change every cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Island {
    height: usize,
    width: usize,
    cells: Vec<Cell>,
}

impl Island {
    pub fn from_layout(layout: &str) -> Result<Island, LayoutError> {
        Self::from_layout_with(layout, &BiomeParams::default())
    }

    /// Builds the grid from a multiline biome-code layout. The layout
    /// must be rectangular and bordered entirely by ocean.
    pub fn from_layout_with(layout: &str, biomes: &BiomeParams) -> Result<Island, LayoutError> {
        let lines: Vec<&str> = layout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if lines.is_empty() {
            return Err(LayoutError::Empty);
        }

        let height = lines.len();
        let width = lines[0].chars().count();
        let mut cells = Vec::with_capacity(height * width);

        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(LayoutError::RaggedLine {
                    line: row,
                    expected: width,
                    found,
                });
            }
            for (col, code) in line.chars().enumerate() {
                let biome =
                    Biome::from_code(code).ok_or(LayoutError::UnknownBiome { code, row, col })?;
                let on_border = row == 0 || row == height - 1 || col == 0 || col == width - 1;
                if on_border && biome != Biome::Ocean {
                    return Err(LayoutError::NonOceanBorder { code, row, col });
                }
                cells.push(Cell::new(biome, biome.initial_fodder(biomes)));
            }
        }

        Ok(Island {
            height,
            width,
            cells,
        })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    fn index(&self, coord: Coord) -> usize {
        coord.row * self.width + coord.col
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.row < self.height && coord.col < self.width
    }

    pub fn cell(&self, coord: Coord) -> &Cell {
        &self.cells[self.index(coord)]
    }

    pub fn cell_mut(&mut self, coord: Coord) -> &mut Cell {
        let index = self.index(coord);
        &mut self.cells[index]
    }

    /// All coordinates in row-major order. Every phase iterates cells in
    /// this order to keep runs reproducible.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.height).flat_map(move |row| (0..self.width).map(move |col| Coord { row, col }))
    }

    pub fn habitable_coords(&self) -> Vec<Coord> {
        self.coords()
            .filter(|coord| self.cell(*coord).biome.is_habitable())
            .collect()
    }

    /// Orthogonal neighbors inside the grid. The ocean border guarantees
    /// every habitable cell has four.
    pub fn neighbors(&self, coord: Coord) -> Vec<Coord> {
        let mut neighbors = Vec::with_capacity(4);
        if coord.row > 0 {
            neighbors.push(Coord::new(coord.row - 1, coord.col));
        }
        if coord.row + 1 < self.height {
            neighbors.push(Coord::new(coord.row + 1, coord.col));
        }
        if coord.col > 0 {
            neighbors.push(Coord::new(coord.row, coord.col - 1));
        }
        if coord.col + 1 < self.width {
            neighbors.push(Coord::new(coord.row, coord.col + 1));
        }
        neighbors
    }

    /// Validates the whole batch before mutating anything, so a bad entry
    /// means nothing from the batch is inserted.
    pub fn insert_population(
        &mut self,
        entries: &[PopulationEntry],
        params: &ParamTable,
    ) -> Result<(), ValidationError> {
        let mut validated: Vec<(Coord, Species, u32, f64)> = Vec::new();
        for entry in entries {
            let coord = entry.location;
            if !self.contains(coord) {
                return Err(ValidationError::OutOfBounds {
                    row: coord.row,
                    col: coord.col,
                });
            }
            let biome = self.cell(coord).biome;
            if !biome.is_habitable() {
                return Err(ValidationError::NotHabitable {
                    biome: biome.name(),
                    row: coord.row,
                    col: coord.col,
                });
            }
            for spec in &entry.animals {
                let species = Species::from_name(&spec.species)
                    .ok_or_else(|| ValidationError::UnknownSpecies(spec.species.clone()))?;
                if spec.age < 0 {
                    return Err(ValidationError::NegativeAge(spec.age));
                }
                if spec.weight < 0.0 {
                    return Err(ValidationError::NegativeWeight(spec.weight));
                }
                validated.push((coord, species, spec.age as u32, spec.weight));
            }
        }

        for (coord, species, age, weight) in validated {
            let animal = Animal::new(species, age, weight, params.species(species));
            self.cell_mut(coord).animals_mut(species).push(animal);
        }
        Ok(())
    }

    pub fn census(&self) -> Census {
        let mut census = Census::default();
        for cell in &self.cells {
            census.herbivores += cell.herbivores.len();
            census.carnivores += cell.carnivores.len();
            census.vultures += cell.vultures.len();
        }
        census.total = census.herbivores + census.carnivores + census.vultures;
        census
    }
}
