//! Genetic search over tours.
//!
//! - [`GaConfig`]: validated search settings
//! - [`Generation`]: fixed-size population with champion tracking and
//!   selection primitives
//! - [`Tour::partially_mapped_crossover`](crate::models::Tour::partially_mapped_crossover):
//!   PMX recombination
//! - [`GaRunner`]: the generational loop with elitism and best-ever tracking

mod config;
mod crossover;
mod generation;
mod runner;

pub use config::GaConfig;
pub use generation::Generation;
pub use runner::{GaRunner, InfoLogger};
