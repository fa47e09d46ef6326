//! Partially mapped crossover (PMX) for tours.
//!
//! # Algorithm (Goldberg & Lingle, 1985)
//!
//! 1. Pick a random swath `[lo, hi]` of length `1..n`
//! 2. Copy the caller's cities in the swath to the child at the same positions
//! 3. Outside the swath take the other parent's city; if that city already
//!    sits in the caller's swath, follow the swath mapping
//!    `caller[i] → other[i]` until reaching a city outside the swath
//!
//! Step 3 places each city exactly once, so the child is always a valid
//! permutation.
//!
//! # Complexity
//!
//! O(n) time, O(n) space.

use rand::Rng;

use crate::distance::DistanceGraph;
use crate::error::{TspError, TspResult};
use crate::models::Tour;

impl<G: DistanceGraph> Tour<G> {
    /// Produces a child tour by PMX of `self` (swath donor) and `other`.
    ///
    /// Both parents are left unchanged. Fails if the tours are measured on
    /// different graphs.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    /// use u_tsp::distance::{DistanceMatrix, Point};
    /// use u_tsp::models::Tour;
    ///
    /// let points: Vec<Point> = (0..6).map(|i| Point::new(i as f64, 0.0)).collect();
    /// let graph = Arc::new(DistanceMatrix::from_points(&points));
    /// let p1 = Tour::new(graph.clone());
    /// let p2 = Tour::from_order(vec![5, 3, 1, 0, 2, 4], graph).unwrap();
    ///
    /// let mut rng = StdRng::seed_from_u64(42);
    /// let child = p1.partially_mapped_crossover(&p2, &mut rng).unwrap();
    /// assert!(child.validate_permutation().is_ok());
    /// ```
    pub fn partially_mapped_crossover<R: Rng>(
        &self,
        other: &Tour<G>,
        rng: &mut R,
    ) -> TspResult<Tour<G>> {
        if !self.same_graph(other) {
            return Err(TspError::invalid_argument(
                "crossover parents refer to different graphs",
            ));
        }

        let n = self.order.len();
        if n < 2 {
            return Ok(self.clone());
        }

        let swath = rng.random_range(1..n);
        let lo = rng.random_range(0..=n - swath);
        let hi = lo + swath - 1;

        Ok(Tour::with_order(
            pmx_child(&self.order, &other.order, lo, hi),
            self.graph.clone(),
        ))
    }
}

/// Builds one PMX child: swath `[lo, hi]` from `donor`, the rest mapped from `other`.
fn pmx_child(donor: &[usize], other: &[usize], lo: usize, hi: usize) -> Vec<usize> {
    let n = donor.len();
    let mut mapping: Vec<Option<usize>> = vec![None; n];
    for i in lo..=hi {
        mapping[donor[i]] = Some(other[i]);
    }

    let mut child = other.to_vec();
    child[lo..=hi].copy_from_slice(&donor[lo..=hi]);

    for (i, slot) in child.iter_mut().enumerate() {
        if (lo..=hi).contains(&i) {
            continue;
        }
        let mut city = other[i];
        while let Some(mapped) = mapping[city] {
            city = mapped;
        }
        *slot = city;
    }

    child
}
