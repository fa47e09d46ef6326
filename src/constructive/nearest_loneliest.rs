//! Nearest-loneliest-neighbor construction heuristic.
//!
//! Plain nearest neighbor tends to leave one remote city for last and pay a
//! long closing edge. This variant biases early visits toward lonely cities:
//!
//! 1. Loneliness of a city = its average distance to all other cities
//! 2. Reflect each loneliness value about the midpoint of the min and max,
//!    so the loneliest city gets the smallest score
//! 3. Adjusted distance `a(i, j) = (d(i, j) + score(i)) / 2`
//! 4. Seed the tour with the cheapest adjusted edge `(i, j)`, `i < j`, then
//!    extend greedily under the adjusted matrix
//!
//! # Complexity
//!
//! O(n²) time and space.

use std::sync::Arc;

use crate::distance::{DistanceGraph, DistanceMatrix};
use crate::models::Tour;

use super::nearest_neighbor::extend_greedily;

/// Builds a tour with the nearest-loneliest-neighbor heuristic.
///
/// Deterministic for a given graph. Graphs with fewer than two vertices
/// yield the identity tour.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_tsp::constructive::nearest_loneliest_neighbor;
/// use u_tsp::distance::{DistanceMatrix, Point};
///
/// let graph = Arc::new(DistanceMatrix::from_points(&[
///     Point::new(0.0, 0.0),
///     Point::new(1.0, 0.0),
///     Point::new(1.0, 1.0),
///     Point::new(9.0, 9.0),
/// ]));
/// let tour = nearest_loneliest_neighbor(&graph);
/// assert!(tour.validate_permutation().is_ok());
/// ```
pub fn nearest_loneliest_neighbor<G: DistanceGraph>(graph: &Arc<G>) -> Tour<G> {
    let n = graph.vertex_count();
    if n < 2 {
        return Tour::new(Arc::clone(graph));
    }

    let adjusted = loneliness_adjusted_distances(graph.as_ref());

    let mut seed = (0, 1);
    let mut cheapest = f64::INFINITY;
    for i in 0..n - 1 {
        for j in (i + 1)..n {
            if adjusted.get(i, j) < cheapest {
                cheapest = adjusted.get(i, j);
                seed = (i, j);
            }
        }
    }

    let mut order = Vec::with_capacity(n);
    order.push(seed.0);
    order.push(seed.1);
    order.extend((0..n).filter(|&c| c != seed.0 && c != seed.1));
    extend_greedily(&mut order, 1, |from, to| adjusted.get(from, to));

    Tour::with_order(order, Arc::clone(graph))
}

/// Returns the loneliness-adjusted distance matrix used by
/// [`nearest_loneliest_neighbor`]. Row `i` is shifted by city `i`'s
/// reflected loneliness, so the result is not symmetric in general.
pub fn loneliness_adjusted_distances<G: DistanceGraph + ?Sized>(graph: &G) -> DistanceMatrix {
    let n = graph.vertex_count();
    let mut adjusted = DistanceMatrix::new(n);
    if n < 2 {
        return adjusted;
    }

    let loneliness: Vec<f64> = (0..n)
        .map(|i| (0..n).map(|j| graph.distance(i, j)).sum::<f64>() / (n - 1) as f64)
        .collect();
    let min = loneliness.iter().copied().fold(f64::INFINITY, f64::min);
    let max = loneliness.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let midpoint = (min + max) / 2.0;

    for (i, &lonely) in loneliness.iter().enumerate() {
        let score = 2.0 * midpoint - lonely;
        for j in 0..n {
            adjusted.set(i, j, (graph.distance(i, j) + score) / 2.0);
        }
    }
    adjusted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::Point;

    fn line3() -> Arc<DistanceMatrix> {
        Arc::new(DistanceMatrix::from_points(&[
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
        ]))
    }

    #[test]
    fn test_adjusted_matrix_values() {
        // loneliness: [1.5, 1.0, 1.5], midpoint 1.25, scores [1.0, 1.5, 1.0]
        let adjusted = loneliness_adjusted_distances(line3().as_ref());
        let expected = [
            [0.5, 1.0, 1.5],
            [1.25, 0.75, 1.25],
            [1.5, 1.0, 0.5],
        ];
        for (i, row) in expected.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                assert!((adjusted.get(i, j) - value).abs() < 1e-10, "a({i}, {j})");
            }
        }
    }

    #[test]
    fn test_nln_seeds_with_cheapest_adjusted_edge() {
        let tour = nearest_loneliest_neighbor(&line3());
        assert_eq!(tour.order(), &[0, 1, 2]);
        assert!((tour.length() - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_nln_is_deterministic_and_seeded_by_cheapest_edge() {
        let graph = Arc::new(DistanceMatrix::from_points(&[
            Point::new(20.0, 20.0),
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
        ]));
        let tour = nearest_loneliest_neighbor(&graph);
        assert!(tour.validate_permutation().is_ok());
        assert_eq!(tour.order(), nearest_loneliest_neighbor(&graph).order());

        let adjusted = loneliness_adjusted_distances(graph.as_ref());
        let (a, b) = (tour.order()[0], tour.order()[1]);
        assert!(a < b);
        for i in 0..5 {
            for j in (i + 1)..5 {
                assert!(adjusted.get(a, b) <= adjusted.get(i, j) + 1e-12);
            }
        }
    }

    #[test]
    fn test_nln_small_graphs() {
        let single = Arc::new(DistanceMatrix::new(1));
        assert_eq!(nearest_loneliest_neighbor(&single).order(), &[0]);

        let pair = Arc::new(DistanceMatrix::from_data(2, vec![0.0, 3.0, 3.0, 0.0]).expect("valid"));
        let tour = nearest_loneliest_neighbor(&pair);
        assert!(tour.validate_permutation().is_ok());
        assert!((tour.length() - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_uniform_distances_keep_raw_matrix_shape() {
        let graph = DistanceMatrix::from_data(3, vec![0.0, 2.0, 2.0, 2.0, 0.0, 2.0, 2.0, 2.0, 0.0])
            .expect("valid");
        let adjusted = loneliness_adjusted_distances(&graph);
        // every city is equally lonely: score = 2.0
        assert!((adjusted.get(0, 1) - 2.0).abs() < 1e-10);
        assert!((adjusted.get(1, 1) - 1.0).abs() < 1e-10);
    }
}
