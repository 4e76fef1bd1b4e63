use std::collections::BTreeMap;
use std::path::PathBuf;

use rossoya::{
    engine::{EngineBuilder, EngineSettings},
    island::{AnimalSpec, Coord, Island, PopulationEntry},
    scenario::ScenarioLoader,
    species::{ParamTable, Species},
};

fn scenario_loader() -> ScenarioLoader {
    ScenarioLoader::new(env!("CARGO_MANIFEST_DIR"))
}

fn scenario_path() -> PathBuf {
    PathBuf::from("scenarios/rossoya.yaml")
}

fn build_engine(seed: u64, census_dir: PathBuf, census_interval: u64) -> EngineBuilder {
    let settings = EngineSettings {
        scenario_name: "rossoya".into(),
        seed,
        census_interval_years: census_interval,
        census_dir,
    };
    EngineBuilder::annual_cycle(settings)
}

fn herd(row: usize, col: usize, species: &str, count: usize, age: i64, weight: f64) -> PopulationEntry {
    PopulationEntry {
        location: Coord::new(row, col),
        animals: (0..count)
            .map(|_| AnimalSpec {
                species: species.to_string(),
                age,
                weight,
            })
            .collect(),
    }
}

#[test]
fn scenario_loader_reads_fixture() {
    let loader = scenario_loader();
    let scenario = loader.load(scenario_path()).expect("scenario parses");
    assert_eq!(scenario.name, "rossoya");
    assert_eq!(scenario.seed, 3);
    let animals: usize = scenario.populations.iter().map(|p| p.animals.len()).sum();
    assert_eq!(animals, 18);

    let params = scenario.build_params().expect("overrides apply");
    assert_eq!(
        params.species(Species::Carnivore).delta_phi_max,
        Some(10.0)
    );
    let island = scenario.build_island(&params).expect("island builds");
    let census = island.census();
    assert_eq!(census.herbivores, 11);
    assert_eq!(census.carnivores, 4);
    assert_eq!(census.vultures, 3);
}

#[test]
fn engine_runs_deterministically() {
    let loader = scenario_loader();
    let scenario = loader.load(scenario_path()).unwrap();
    let params = scenario.build_params().unwrap();
    let years = 20;

    let mut island_a = scenario.build_island(&params).unwrap();
    let mut engine_a = build_engine(scenario.seed, PathBuf::from("census_test_a"), 0)
        .with_params(params.clone())
        .build();
    engine_a.run(&mut island_a, years).unwrap();

    let mut island_b = scenario.build_island(&params).unwrap();
    let mut engine_b = build_engine(scenario.seed, PathBuf::from("census_test_b"), 0)
        .with_params(params)
        .build();
    engine_b.run(&mut island_b, years).unwrap();

    assert_eq!(island_a.census(), island_b.census());
    for coord in island_a.habitable_coords() {
        let a = island_a.cell(coord);
        let b = island_b.cell(coord);
        assert_eq!(a.population(), b.population(), "mismatch at {coord:?}");
    }
}

#[test]
fn engine_emits_census_reports() {
    let loader = scenario_loader();
    let scenario = loader.load(scenario_path()).unwrap();
    let params = scenario.build_params().unwrap();
    let temp_dir = tempfile::tempdir().unwrap();
    let census_dir = temp_dir.path().join("census");

    let mut island = scenario.build_island(&params).unwrap();
    let mut engine = build_engine(scenario.seed, census_dir.clone(), 10)
        .with_params(params)
        .build();
    engine.run(&mut island, 30).unwrap();

    for year in [10, 20, 30] {
        let expected = census_dir.join(format!("census_{year:06}.json"));
        assert!(
            expected.exists(),
            "expected census report {} to exist",
            expected.display()
        );
    }

    let data = std::fs::read_to_string(census_dir.join("census_000010.json")).unwrap();
    assert!(
        data.contains("\"scenario\": \"rossoya\""),
        "report should carry the scenario name"
    );
}

#[test]
fn interval_zero_disables_census_output() {
    let loader = scenario_loader();
    let scenario = loader.load(scenario_path()).unwrap();
    let params = scenario.build_params().unwrap();
    let temp_dir = tempfile::tempdir().unwrap();
    let census_dir = temp_dir.path().join("census");

    let mut island = scenario.build_island(&params).unwrap();
    let mut engine = build_engine(scenario.seed, census_dir.clone(), 0)
        .with_params(params)
        .build();
    engine.run(&mut island, 15).unwrap();

    assert!(!census_dir.exists(), "no reports should be written");
}

#[test]
fn one_year_on_a_single_cell_is_exact() {
    // One habitable cell, death switched off, so the year is fully
    // predictable: graze 10, gain 9, age up, shed 5 percent.
    let mut island = Island::from_layout("OOO\nOJO\nOOO").unwrap();
    let mut params = ParamTable::default();
    params
        .override_species(
            Species::Herbivore,
            &BTreeMap::from([("omega".to_string(), 0.0)]),
        )
        .unwrap();
    island
        .insert_population(&[herd(1, 1, "Herbivore", 1, 5, 20.0)], &params)
        .unwrap();

    let mut engine = build_engine(1, PathBuf::from("census_unused"), 0)
        .with_params(params)
        .build();
    engine.advance_year(&mut island).unwrap();

    let cell = island.cell(Coord::new(1, 1));
    assert_eq!(cell.herbivores.len(), 1);
    let animal = &cell.herbivores[0];
    assert_eq!(animal.age, 6);
    assert!((animal.weight - 29.0 * 0.95).abs() < 1e-9);
    assert!((cell.fodder - 790.0).abs() < 1e-9);
}

#[test]
fn herbivores_thrive_without_predators() {
    let mut island = Island::from_layout("OOOOO\nOJJJO\nOJJJO\nOOOOO").unwrap();
    let params = ParamTable::default();
    island
        .insert_population(&[herd(1, 1, "Herbivore", 50, 5, 20.0)], &params)
        .unwrap();

    let mut engine = build_engine(7, PathBuf::from("census_unused"), 0)
        .with_params(params)
        .build();
    engine.run(&mut island, 20).unwrap();

    let census = island.census();
    assert!(
        census.herbivores > 50,
        "expected growth, got {}",
        census.herbivores
    );
    assert_eq!(census.carnivores, 0);
    assert_eq!(census.vultures, 0);
}

#[test]
fn cycle_conserves_or_shrinks_without_breeding() {
    // gamma zero blocks births, so every later census is bounded by the
    // previous one no matter what the rest of the cycle does.
    let mut island = Island::from_layout("OOOOO\nOJSJO\nOOOOO").unwrap();
    let mut params = ParamTable::default();
    for species in Species::ALL {
        params
            .override_species(species, &BTreeMap::from([("gamma".to_string(), 0.0)]))
            .unwrap();
    }
    island
        .insert_population(
            &[
                herd(1, 1, "Herbivore", 20, 5, 25.0),
                herd(1, 2, "Carnivore", 4, 4, 30.0),
                herd(1, 3, "Vulture", 3, 3, 14.0),
            ],
            &params,
        )
        .unwrap();

    let mut engine = build_engine(5, PathBuf::from("census_unused"), 0)
        .with_params(params)
        .build();
    let mut previous = island.census().total;
    for _ in 0..15 {
        engine.advance_year(&mut island).unwrap();
        let now = island.census().total;
        assert!(now <= previous, "population grew with gamma zero");
        previous = now;
    }
}

#[test]
fn unknown_species_in_population_is_rejected() {
    let mut island = Island::from_layout("OOO\nOJO\nOOO").unwrap();
    let params = ParamTable::default();
    let err = island
        .insert_population(&[herd(1, 1, "Wolf", 1, 2, 30.0)], &params)
        .unwrap_err();
    assert_eq!(err.to_string(), "unknown species 'Wolf'");
    assert_eq!(island.census().total, 0);
}

#[test]
fn runtime_overrides_take_effect_for_later_years() {
    let mut island = Island::from_layout("OOO\nOJO\nOOO").unwrap();
    let params = ParamTable::default();
    island
        .insert_population(&[herd(1, 1, "Herbivore", 4, 5, 60.0)], &params)
        .unwrap();

    let mut engine = build_engine(11, PathBuf::from("census_unused"), 0)
        .with_params(params)
        .build();
    engine
        .override_species_parameters(
            Species::Herbivore,
            &BTreeMap::from([("omega".to_string(), 0.0), ("gamma".to_string(), 0.0)]),
        )
        .unwrap();
    assert_eq!(engine.params().species(Species::Herbivore).omega, 0.0);

    engine.run(&mut island, 10).unwrap();
    // Nobody breeds and nobody dies of old age, so the herd is intact.
    assert_eq!(island.census().herbivores, 4);
}
