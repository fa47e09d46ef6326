//! # u-tsp
//!
//! Hybrid genetic search for the symmetric traveling salesman problem.
//!
//! Tours keep their cyclic length up to date under swap and 2-opt moves, so
//! local search and mutation never rescan the whole tour. The GA seeds its
//! population with construction heuristics and random permutations, then
//! evolves it with tournament selection, PMX crossover, 2-opt mutation and
//! elitism.
//!
//! ## Modules
//!
//! - [`distance`]: distance graph trait and dense matrix
//! - [`models`]: the [`Tour`](models::Tour) permutation with cached length
//! - [`constructive`]: nearest-neighbor and nearest-loneliest-neighbor heuristics
//! - [`local_search`]: 2-opt and swap hill climbing
//! - [`ga`]: population, crossover, configuration and the GA runner
//! - [`error`]: the crate error type
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use u_tsp::distance::{DistanceMatrix, Point};
//! use u_tsp::ga::{GaConfig, GaRunner};
//!
//! let points: Vec<Point> = (0..12)
//!     .map(|i| {
//!         let angle = i as f64 * std::f64::consts::TAU / 12.0;
//!         Point::new(angle.cos(), angle.sin())
//!     })
//!     .collect();
//! let graph = Arc::new(DistanceMatrix::from_points(&points));
//!
//! let config = GaConfig::new(100, 16, 2, 3, 0.7, 0.2).unwrap();
//! let mut runner = GaRunner::with_seed(graph, config, 7);
//! runner.run().unwrap();
//!
//! let best = runner.champion().unwrap();
//! assert!(best.validate_permutation().is_ok());
//! println!("{best}");
//! ```

pub mod constructive;
pub mod distance;
pub mod error;
pub mod ga;
pub mod local_search;
pub mod models;

pub use error::{TspError, TspResult};
