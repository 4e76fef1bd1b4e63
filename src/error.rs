use thiserror::Error;

/// Raised while parsing an island layout string.
#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    #[error("island layout is empty")]
    Empty,
    #[error("island layout line {line} has {found} columns, expected {expected}")]
    RaggedLine {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("island border must be ocean, found '{code}' at ({row}, {col})")]
    NonOceanBorder { code: char, row: usize, col: usize },
    #[error("unknown biome code '{code}' at ({row}, {col})")]
    UnknownBiome { code: char, row: usize, col: usize },
}

/// Raised while validating a population batch. The batch inserts nothing
/// when any entry fails.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("unknown species '{0}'")]
    UnknownSpecies(String),
    #[error("location ({row}, {col}) is outside the island")]
    OutOfBounds { row: usize, col: usize },
    #[error("cannot place animals on {biome} at ({row}, {col})")]
    NotHabitable {
        biome: &'static str,
        row: usize,
        col: usize,
    },
    #[error("age {0} is negative")]
    NegativeAge(i64),
    #[error("weight {0} is negative")]
    NegativeWeight(f64),
}

/// Raised by species or biome parameter overrides. The parameter table is
/// untouched when an override fails.
#[derive(Debug, Error, PartialEq)]
pub enum ParameterError {
    #[error("unknown parameter '{key}' for {target}")]
    UnknownKey { target: &'static str, key: String },
    #[error("parameter '{key}' value {value} is outside its domain: {constraint}")]
    OutOfDomain {
        key: String,
        value: f64,
        constraint: &'static str,
    },
}
