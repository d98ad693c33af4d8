//! Startup wiring for sample catalogue seeding.
//!
//! Gated behind the `sample-data` feature: deployments that never seed do
//! not carry the generator or its RNG dependency.

mod config;
mod generator;
mod startup;

pub use config::SampleDataSettings;
pub use generator::generate_books;
pub use startup::{SampleSeedOutcome, StartupSeedingError, seed_sample_data_on_startup};
