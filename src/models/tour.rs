//! Permutation tour with a cached cyclic length.
//!
//! A [`Tour`] visits every vertex of its graph exactly once and returns to
//! the start. The `length` field always equals the closed-cycle length of
//! `order`; every mutator keeps it consistent, incrementally where the move
//! touches a constant number of edges.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use rand::Rng;

use crate::distance::{DistanceGraph, DistanceMatrix};
use crate::error::{TspError, TspResult};

/// A closed visiting order over all vertices of a shared graph.
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
/// let mut tour = Tour::new(graph);
/// assert!((tour.length() - 4.0).abs() < 1e-10);
///
/// tour.position_swap(1, 2).unwrap();
/// assert!((tour.length() - (2.0 + 2.0 * 2f64.sqrt())).abs() < 1e-10);
/// ```
pub struct Tour<G = DistanceMatrix> {
    pub(crate) order: Vec<usize>,
    pub(crate) length: f64,
    pub(crate) graph: Arc<G>,
}

impl<G: DistanceGraph> Tour<G> {
    /// Creates the identity tour `0, 1, ..., V-1`.
    pub fn new(graph: Arc<G>) -> Self {
        let order = (0..graph.vertex_count()).collect();
        Self::with_order(order, graph)
    }

    /// Creates a tour from an explicit visiting order.
    ///
    /// Fails if the order length differs from the vertex count or the order
    /// is not a permutation of `0..V`.
    pub fn from_order(order: Vec<usize>, graph: Arc<G>) -> TspResult<Self> {
        if order.len() != graph.vertex_count() {
            return Err(TspError::invalid_argument(format!(
                "order has {} cities but the graph has {} vertices",
                order.len(),
                graph.vertex_count()
            )));
        }
        check_permutation(&order).map_err(TspError::InvalidArgument)?;
        Ok(Self::with_order(order, graph))
    }

    /// Parses a tour from its textual form (see the [`Display`](fmt::Display) impl).
    ///
    /// City ids in the text are 1-based. The stored length is recomputed
    /// from `graph`; the `DISTANCE` line is ignored.
    pub fn from_tour_text(text: &str, graph: Arc<G>) -> TspResult<Self> {
        let mut dimension = None;
        let mut lines = text.lines();
        let mut has_section = false;

        for line in lines.by_ref() {
            let line = line.trim();
            if line == "TOUR_SECTION" {
                has_section = true;
                break;
            }
            if let Some((key, value)) = line.split_once(':') {
                if key.trim() == "DIMENSION" {
                    let parsed = value.trim().parse::<usize>().map_err(|_| {
                        TspError::invalid_argument(format!("bad dimension '{}'", value.trim()))
                    })?;
                    dimension = Some(parsed);
                }
            }
        }

        let dimension = match (dimension, has_section) {
            (Some(d), true) => d,
            _ => {
                return Err(TspError::invalid_argument(
                    "tour text needs a DIMENSION line and a TOUR_SECTION",
                ))
            }
        };
        if dimension != graph.vertex_count() {
            return Err(TspError::invalid_argument(format!(
                "tour dimension {dimension} differs from graph size {}",
                graph.vertex_count()
            )));
        }

        let mut order = Vec::with_capacity(dimension);
        for token in lines.flat_map(str::split_whitespace) {
            if order.len() == dimension || token == "-1" || token == "EOF" {
                break;
            }
            let id = token
                .parse::<usize>()
                .ok()
                .filter(|&id| (1..=dimension).contains(&id))
                .ok_or_else(|| TspError::invalid_argument(format!("bad city id '{token}'")))?;
            order.push(id - 1);
        }

        Self::from_order(order, graph)
    }

    pub(crate) fn with_order(order: Vec<usize>, graph: Arc<G>) -> Self {
        let mut tour = Self {
            order,
            length: 0.0,
            graph,
        };
        tour.length = tour.recompute_length();
        tour
    }

    /// Total cyclic length, including the edge back to the first city.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Number of cities in the tour.
    pub fn size(&self) -> usize {
        self.order.len()
    }

    /// City visited at `position`.
    pub fn city_at(&self, position: usize) -> TspResult<usize> {
        TspError::check_index(position, self.order.len())?;
        Ok(self.order[position])
    }

    /// The visiting order.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// The graph this tour is measured on.
    pub fn graph(&self) -> &Arc<G> {
        &self.graph
    }

    /// Returns `true` if both tours are measured on the same graph instance.
    pub fn same_graph(&self, other: &Tour<G>) -> bool {
        Arc::ptr_eq(&self.graph, &other.graph)
    }

    /// Orders tours by length, shortest first.
    pub fn cmp_length(&self, other: &Tour<G>) -> Ordering {
        self.length.total_cmp(&other.length)
    }

    /// Computes the cyclic length from scratch.
    pub fn recompute_length(&self) -> f64 {
        (0..self.order.len()).map(|k| self.edge(k)).sum()
    }

    /// Exchanges the cities at positions `i` and `j`.
    ///
    /// Only the (at most four) edges touching `i` and `j` are re-measured.
    pub fn position_swap(&mut self, i: usize, j: usize) -> TspResult<()> {
        let n = self.order.len();
        TspError::check_index(i, n)?;
        TspError::check_index(j, n)?;

        self.swap_unchecked(i, j);
        Ok(())
    }

    pub(crate) fn swap_unchecked(&mut self, i: usize, j: usize) {
        let mut edges = [self.prev(i), i, self.prev(j), j];
        edges.sort_unstable();
        let before = self.distinct_edges_length(&edges);
        self.order.swap(i, j);
        self.length += self.distinct_edges_length(&edges) - before;
    }

    /// Reverses the run of positions between `i` and `j` inclusive (2-opt move).
    ///
    /// The length delta is computed from the two boundary edges in O(1);
    /// interior edges keep their lengths on a symmetric graph.
    pub fn segment_reversal(&mut self, i: usize, j: usize) -> TspResult<()> {
        let n = self.order.len();
        TspError::check_index(i, n)?;
        TspError::check_index(j, n)?;

        let (lo, hi) = if i <= j { (i, j) } else { (j, i) };
        if lo == hi {
            return Ok(());
        }
        if hi - lo + 1 == n {
            // Reversing the whole cycle has no boundary edges.
            self.order.reverse();
            self.length = self.recompute_length();
            return Ok(());
        }

        self.reverse_interior(lo, hi);
        Ok(())
    }

    /// Reverses `[lo, hi]` for `lo < hi` where the run is not the whole cycle.
    pub(crate) fn reverse_interior(&mut self, lo: usize, hi: usize) {
        let before_lo = self.order[self.prev(lo)];
        let after_hi = self.order[self.next(hi)];
        let (first, last) = (self.order[lo], self.order[hi]);
        let removed = self.dist(before_lo, first) + self.dist(last, after_hi);
        let added = self.dist(before_lo, last) + self.dist(first, after_hi);

        self.length += added - removed;
        self.order[lo..=hi].reverse();
    }

    /// Replaces the order with a uniformly random permutation.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) {
        let n = self.order.len();
        for i in 0..n.saturating_sub(1) {
            let j = rng.random_range(i..n);
            self.order.swap(i, j);
        }
        self.length = self.recompute_length();
    }

    /// Confirms that the order is a bijection on `0..V`.
    pub fn validate_permutation(&self) -> TspResult<()> {
        if self.order.len() != self.graph.vertex_count() {
            return Err(TspError::invalid_state(
                "tour size differs from graph vertex count",
            ));
        }
        check_permutation(&self.order).map_err(TspError::InvalidState)
    }

    pub(crate) fn dist(&self, from: usize, to: usize) -> f64 {
        self.graph.distance(from, to)
    }

    /// Length of the edge leaving position `k`.
    pub(crate) fn edge(&self, k: usize) -> f64 {
        self.dist(self.order[k], self.order[self.next(k)])
    }

    pub(crate) fn prev(&self, k: usize) -> usize {
        let n = self.order.len();
        (k + n - 1) % n
    }

    pub(crate) fn next(&self, k: usize) -> usize {
        (k + 1) % self.order.len()
    }

    // `edges` must be sorted.
    fn distinct_edges_length(&self, edges: &[usize; 4]) -> f64 {
        let mut total = 0.0;
        for (k, &e) in edges.iter().enumerate() {
            if k == 0 || edges[k - 1] != e {
                total += self.edge(e);
            }
        }
        total
    }
}

/// Cycle-following bijection check: places every value at its own index by
/// swapping, failing on the first out-of-range or duplicated value.
fn check_permutation(order: &[usize]) -> Result<(), String> {
    let n = order.len();
    let mut cells = order.to_vec();
    for i in 0..n {
        while cells[i] != i {
            let v = cells[i];
            if v >= n {
                return Err(format!("city {v} is out of range for {n} cities"));
            }
            if cells[v] == v {
                return Err(format!("city {v} appears more than once"));
            }
            cells.swap(i, v);
        }
    }
    Ok(())
}

impl<G> Clone for Tour<G> {
    fn clone(&self) -> Self {
        Self {
            order: self.order.clone(),
            length: self.length,
            graph: Arc::clone(&self.graph),
        }
    }
}

impl<G> fmt::Debug for Tour<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tour")
            .field("order", &self.order)
            .field("length", &self.length)
            .finish()
    }
}

/// Writes the persisted tour form: type tag, dimension, length, and the
/// 1-based city sequence.
impl<G> fmt::Display for Tour<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TYPE: TOUR")?;
        writeln!(f, "DIMENSION: {}", self.order.len())?;
        writeln!(f, "DISTANCE: {}", self.length)?;
        writeln!(f, "TOUR_SECTION")?;
        let cities: Vec<String> = self.order.iter().map(|c| (c + 1).to_string()).collect();
        writeln!(f, "{}", cities.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::Point;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn unit_square() -> Arc<DistanceMatrix> {
        Arc::new(DistanceMatrix::from_points(&[
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ]))
    }

    fn random_graph(n: usize, seed: u64) -> Arc<DistanceMatrix> {
        let mut rng = StdRng::seed_from_u64(seed);
        let points: Vec<Point> = (0..n)
            .map(|_| Point::new(rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)))
            .collect();
        Arc::new(DistanceMatrix::from_points(&points))
    }

    #[test]
    fn test_identity_tour() {
        let tour = Tour::new(unit_square());
        assert_eq!(tour.order(), &[0, 1, 2, 3]);
        assert_eq!(tour.size(), 4);
        assert!((tour.length() - 4.0).abs() < 1e-10);
        assert!(tour.validate_permutation().is_ok());
    }

    #[test]
    fn test_from_order() {
        let tour = Tour::from_order(vec![0, 2, 1, 3], unit_square()).expect("valid");
        assert!((tour.length() - (2.0 + 2.0 * 2f64.sqrt())).abs() < 1e-10);
    }

    #[test]
    fn test_from_order_rejects_bad_input() {
        let graph = unit_square();
        assert!(matches!(
            Tour::from_order(vec![0, 1, 2], graph.clone()),
            Err(TspError::InvalidArgument(_))
        ));
        assert!(matches!(
            Tour::from_order(vec![0, 1, 1, 3], graph.clone()),
            Err(TspError::InvalidArgument(_))
        ));
        assert!(matches!(
            Tour::from_order(vec![0, 1, 2, 4], graph),
            Err(TspError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_clone_is_independent() {
        let tour = Tour::new(unit_square());
        let mut copy = tour.clone();
        copy.position_swap(0, 2).expect("in range");
        assert_eq!(tour.order(), &[0, 1, 2, 3]);
        assert_eq!(copy.order(), &[2, 1, 0, 3]);
        assert!(tour.same_graph(&copy));
    }

    #[test]
    fn test_cmp_length() {
        let graph = unit_square();
        let short = Tour::new(graph.clone());
        let long = Tour::from_order(vec![0, 2, 1, 3], graph).expect("valid");
        assert_eq!(short.cmp_length(&long), Ordering::Less);
        assert_eq!(long.cmp_length(&short), Ordering::Greater);
        assert_eq!(short.cmp_length(&short.clone()), Ordering::Equal);

        let mut tours = vec![long.clone(), short.clone()];
        tours.sort_by(Tour::cmp_length);
        assert_eq!(tours[0].order(), short.order());
    }

    #[test]
    fn test_city_at() {
        let tour = Tour::new(unit_square());
        assert_eq!(tour.city_at(3), Ok(3));
        assert_eq!(
            tour.city_at(4),
            Err(TspError::IndexOutOfBounds { index: 4, len: 4 })
        );
    }

    #[test]
    fn test_swap_adjacent_and_wraparound() {
        let graph = random_graph(6, 7);
        let mut tour = Tour::new(graph);
        for (i, j) in [(0, 1), (1, 0), (0, 5), (5, 0), (2, 2), (1, 4)] {
            tour.position_swap(i, j).expect("in range");
            assert!((tour.length() - tour.recompute_length()).abs() < 1e-9);
        }
        assert!(tour.position_swap(0, 6).is_err());
    }

    #[test]
    fn test_reversal_cases() {
        let graph = random_graph(7, 11);
        let mut tour = Tour::new(graph);
        for (i, j) in [(0, 6), (1, 6), (0, 5), (2, 4), (4, 2), (3, 3), (5, 6)] {
            tour.segment_reversal(i, j).expect("in range");
            assert!((tour.length() - tour.recompute_length()).abs() < 1e-9);
        }
        assert!(tour.validate_permutation().is_ok());
    }

    #[test]
    fn test_reversal_reverses_segment() {
        let mut tour = Tour::new(unit_square());
        tour.segment_reversal(2, 1).expect("in range");
        assert_eq!(tour.order(), &[0, 2, 1, 3]);
    }

    #[test]
    fn test_shuffle_keeps_permutation() {
        let mut tour = Tour::new(random_graph(20, 3));
        let mut rng = StdRng::seed_from_u64(42);
        tour.shuffle(&mut rng);
        assert!(tour.validate_permutation().is_ok());
        assert!((tour.length() - tour.recompute_length()).abs() < 1e-9);
    }

    #[test]
    fn test_single_city() {
        let graph = Arc::new(DistanceMatrix::from_points(&[Point::new(2.0, 3.0)]));
        let mut tour = Tour::new(graph);
        assert_eq!(tour.length(), 0.0);
        tour.position_swap(0, 0).expect("in range");
        tour.segment_reversal(0, 0).expect("in range");
        tour.shuffle(&mut StdRng::seed_from_u64(1));
        assert_eq!(tour.order(), &[0]);
        assert_eq!(tour.length(), 0.0);
    }

    #[test]
    fn test_empty_graph() {
        let tour = Tour::new(Arc::new(DistanceMatrix::new(0)));
        assert_eq!(tour.length(), 0.0);
        assert!(tour.validate_permutation().is_ok());
    }

    #[test]
    fn test_validate_detects_corruption() {
        let mut tour = Tour::new(unit_square());
        tour.order[1] = 0;
        assert!(matches!(
            tour.validate_permutation(),
            Err(TspError::InvalidState(_))
        ));
    }

    #[test]
    fn test_text_round_trip() {
        let graph = unit_square();
        let tour = Tour::from_order(vec![2, 0, 3, 1], graph.clone()).expect("valid");
        let text = tour.to_string();
        assert!(text.starts_with("TYPE: TOUR\nDIMENSION: 4\n"));
        assert!(text.ends_with("TOUR_SECTION\n3 1 4 2\n"));

        let parsed = Tour::from_tour_text(&text, graph).expect("parses");
        assert_eq!(parsed.order(), tour.order());
        assert!((parsed.length() - tour.length()).abs() < 1e-10);
    }

    #[test]
    fn test_text_rejects_malformed() {
        let graph = unit_square();
        let no_section = "TYPE: TOUR\nDIMENSION: 4\n1 2 3 4\n";
        assert!(Tour::from_tour_text(no_section, graph.clone()).is_err());
        let wrong_dim = "DIMENSION: 3\nTOUR_SECTION\n1 2 3\n";
        assert!(Tour::from_tour_text(wrong_dim, graph.clone()).is_err());
        let bad_id = "DIMENSION: 4\nTOUR_SECTION\n1 2 3 9\n";
        assert!(Tour::from_tour_text(bad_id, graph.clone()).is_err());
        let duplicate = "DIMENSION: 4\nTOUR_SECTION\n1 2 2 4\n-1\nEOF\n";
        assert!(Tour::from_tour_text(duplicate, graph).is_err());
    }

    proptest! {
        #[test]
        fn prop_swap_matches_recompute(seed in any::<u64>(), n in 1usize..12, moves in 1usize..20) {
            let graph = random_graph(n, seed);
            let mut rng = StdRng::seed_from_u64(seed ^ 0x5eed);
            let mut tour = Tour::new(graph);
            tour.shuffle(&mut rng);
            for _ in 0..moves {
                let i = rng.random_range(0..n);
                let j = rng.random_range(0..n);
                tour.position_swap(i, j).unwrap();
                prop_assert!((tour.length() - tour.recompute_length()).abs() < 1e-6);
            }
            prop_assert!(tour.validate_permutation().is_ok());
        }

        #[test]
        fn prop_reversal_matches_recompute(seed in any::<u64>(), n in 1usize..12, moves in 1usize..20) {
            let graph = random_graph(n, seed);
            let mut rng = StdRng::seed_from_u64(seed ^ 0x2047);
            let mut tour = Tour::new(graph);
            tour.shuffle(&mut rng);
            for _ in 0..moves {
                let i = rng.random_range(0..n);
                let j = rng.random_range(0..n);
                tour.segment_reversal(i, j).unwrap();
                prop_assert!((tour.length() - tour.recompute_length()).abs() < 1e-6);
            }
            prop_assert!(tour.validate_permutation().is_ok());
        }
    }
}
