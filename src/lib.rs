pub mod animal;
pub mod biome;
pub mod census;
pub mod engine;
pub mod error;
pub mod island;
pub mod rng;
pub mod scenario;
pub mod species;
pub mod systems;

pub use engine::{Engine, EngineBuilder, EngineSettings};
pub use island::{Census, Island};
pub use scenario::{Scenario, ScenarioLoader};
pub use species::{ParamTable, Species};
