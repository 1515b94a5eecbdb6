//! Synthetic time-series generation.

pub mod generator;
pub mod settings;

pub use generator::{generate_ohlc, generate_random_walk, LineBundle, SeriesGenerator};
pub use settings::GeneratorSettings;
