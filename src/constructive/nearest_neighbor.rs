//! Nearest-neighbor construction heuristic.
//!
//! Starts from a uniformly random city and repeatedly appends the nearest
//! city not yet placed.
//!
//! # Complexity
//!
//! O(n²) where n = number of cities.
//!
//! # Reference
//!
//! The simplest TSP construction heuristic. Tours are typically 15-25% above
//! optimal, which makes it a cheap, decent seed for the population.

use std::sync::Arc;

use rand::Rng;

use crate::distance::DistanceGraph;
use crate::models::Tour;

/// Builds a tour with the nearest-neighbor heuristic.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use u_tsp::constructive::nearest_neighbor;
/// use u_tsp::distance::{DistanceMatrix, Point};
///
/// let graph = Arc::new(DistanceMatrix::from_points(&[
///     Point::new(0.0, 0.0),
///     Point::new(1.0, 0.0),
///     Point::new(2.0, 0.0),
///     Point::new(3.0, 0.0),
/// ]));
/// let mut rng = StdRng::seed_from_u64(42);
/// let tour = nearest_neighbor(&graph, &mut rng);
/// assert_eq!(tour.size(), 4);
/// assert!(tour.validate_permutation().is_ok());
/// ```
pub fn nearest_neighbor<G: DistanceGraph, R: Rng>(graph: &Arc<G>, rng: &mut R) -> Tour<G> {
    let n = graph.vertex_count();
    if n == 0 {
        return Tour::new(Arc::clone(graph));
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.swap(0, rng.random_range(0..n));
    extend_greedily(&mut order, 0, |from, to| graph.distance(from, to));

    Tour::with_order(order, Arc::clone(graph))
}

/// Fixes `order[..=placed]` and fills every later position with the nearest
/// remaining city to its predecessor. Ties keep the earliest candidate.
pub(super) fn extend_greedily<F>(order: &mut [usize], placed: usize, distance: F)
where
    F: Fn(usize, usize) -> f64,
{
    let n = order.len();
    for i in placed..n.saturating_sub(1) {
        let current = order[i];
        let mut nearest = i + 1;
        let mut best = f64::INFINITY;
        for j in (i + 1)..n {
            let d = distance(current, order[j]);
            if d < best {
                best = d;
                nearest = j;
            }
        }
        order.swap(i + 1, nearest);
    }
}
