//! Construction heuristics that seed the initial population.
//!
//! - [`nearest_neighbor`]: greedy nearest unvisited city from a random start, O(n²)
//! - [`nearest_loneliest_neighbor`]: nearest neighbor on a loneliness-adjusted
//!   matrix, seeded with the cheapest adjusted edge, O(n²)

mod nearest_loneliest;
mod nearest_neighbor;

pub use nearest_loneliest::{loneliness_adjusted_distances, nearest_loneliest_neighbor};
pub use nearest_neighbor::nearest_neighbor;
