//! Best-improvement 2-opt on a closed tour.
//!
//! # Algorithm
//!
//! For every position pair `(lo, hi)` with `lo < hi`, reversing the run
//! `[lo+1, hi-1]` replaces the edges `(t[lo], t[lo+1])` and `(t[hi-1], t[hi])`
//! with `(t[lo], t[hi-1])` and `(t[lo+1], t[hi])`:
//!
//! ```text
//! old = d(t[lo], t[lo+1]) + d(t[hi-1], t[hi])
//! new = d(t[lo], t[hi-1]) + d(t[lo+1], t[hi])
//! ```
//!
//! Each full scan keeps the improving pair with the smallest `new` and
//! applies only that one reversal. Scanning repeats until a scan finds no
//! improving pair or [`MAX_TWO_OPT_MOVES`] reversals have been applied.
//!
//! # Complexity
//!
//! O(n²) per scan.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use crate::distance::DistanceGraph;
use crate::models::Tour;

use super::IMPROVEMENT_EPS;

/// Upper bound on applied reversals per call.
pub const MAX_TWO_OPT_MOVES: usize = 1000;

impl<G: DistanceGraph> Tour<G> {
    /// Improves the tour with best-of-scan 2-opt moves.
    ///
    /// The length never increases. Returns the number of reversals applied.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use u_tsp::distance::{DistanceMatrix, Point};
    /// use u_tsp::models::Tour;
    ///
    /// let graph = Arc::new(DistanceMatrix::from_points(&[
    ///     Point::new(0.0, 0.0),
    ///     Point::new(1.0, 0.0),
    ///     Point::new(1.0, 1.0),
    ///     Point::new(0.0, 1.0),
    /// ]));
    /// // 0 → 2 → 1 → 3 crosses itself
    /// let mut tour = Tour::from_order(vec![0, 2, 1, 3], graph).unwrap();
    /// tour.local_search_two_opt();
    /// assert!((tour.length() - 4.0).abs() < 1e-10);
    /// ```
    pub fn local_search_two_opt(&mut self) -> usize {
        let n = self.order.len();
        let mut moves = 0;

        while moves < MAX_TWO_OPT_MOVES {
            let mut best: Option<(usize, usize, f64)> = None;

            for lo in 0..n.saturating_sub(1) {
                for hi in (lo + 2)..n {
                    let (old, new) = self.two_opt_boundary(lo, hi);
                    let best_new = best.map_or(f64::INFINITY, |(_, _, b)| b);
                    if old - new > IMPROVEMENT_EPS && new < best_new {
                        best = Some((lo + 1, hi - 1, new));
                    }
                }
            }

            match best {
                Some((from, to, _)) => {
                    self.reverse_interior(from, to);
                    moves += 1;
                }
                None => break,
            }
        }

        moves
    }

    /// Boundary-edge lengths before and after reversing `[lo+1, hi-1]`.
    fn two_opt_boundary(&self, lo: usize, hi: usize) -> (f64, f64) {
        let o = &self.order;
        let old = self.dist(o[lo], o[lo + 1]) + self.dist(o[hi - 1], o[hi]);
        let new = self.dist(o[lo], o[hi - 1]) + self.dist(o[lo + 1], o[hi]);
        (old, new)
    }
}
