//! Fixed-capacity population of tours.
//!
//! A [`Generation`] holds exactly `capacity` tours once populated, all on the
//! same graph. The champion (shortest tour) is tracked while tours are
//! inserted, so queries never rescan the population.
//!
//! # Selection primitives
//!
//! - [`Generation::k_smallest`]: bounded max-heap, O(P log k)
//! - [`Generation::tournament_winner`]: partial Fisher-Yates sample of `t`
//!   distinct tours, O(P + t)

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::sync::Arc;

use rand::Rng;

use crate::distance::{DistanceGraph, DistanceMatrix};
use crate::error::{TspError, TspResult};
use crate::models::Tour;

/// A population of tours evolved together.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_tsp::distance::{DistanceMatrix, Point};
/// use u_tsp::ga::Generation;
/// use u_tsp::models::Tour;
///
/// let graph = Arc::new(DistanceMatrix::from_points(&[
///     Point::new(0.0, 0.0),
///     Point::new(1.0, 0.0),
///     Point::new(1.0, 1.0),
///     Point::new(0.0, 1.0),
/// ]));
/// let mut generation = Generation::new(graph.clone(), 2);
/// generation
///     .populate(vec![
///         Tour::from_order(vec![0, 2, 1, 3], graph.clone()).unwrap(),
///         Tour::new(graph),
///     ])
///     .unwrap();
/// assert!((generation.champion().unwrap().length() - 4.0).abs() < 1e-10);
/// ```
pub struct Generation<G = DistanceMatrix> {
    graph: Arc<G>,
    capacity: usize,
    tours: Vec<Tour<G>>,
    champion: Option<usize>,
}

impl<G: DistanceGraph> Generation<G> {
    /// Creates an empty generation with room for `capacity` tours.
    pub fn new(graph: Arc<G>, capacity: usize) -> Self {
        Self {
            graph,
            capacity,
            tours: Vec::with_capacity(capacity),
            champion: None,
        }
    }

    /// Replaces the whole population.
    ///
    /// Fails without touching the current population if `tours` does not
    /// hold exactly `capacity` tours or any tour is on a different graph.
    pub fn populate(&mut self, tours: Vec<Tour<G>>) -> TspResult<()> {
        if tours.len() != self.capacity {
            return Err(TspError::invalid_argument(format!(
                "population needs {} tours, got {}",
                self.capacity,
                tours.len()
            )));
        }
        if tours.iter().any(|t| !Arc::ptr_eq(t.graph(), &self.graph)) {
            return Err(TspError::invalid_argument(
                "tour refers to a different graph than the generation",
            ));
        }

        self.tours.clear();
        self.champion = None;
        for tour in tours {
            self.insert(tour);
        }
        Ok(())
    }

    fn insert(&mut self, tour: Tour<G>) {
        let is_best = match self.champion {
            Some(best) => tour.cmp_length(&self.tours[best]) == Ordering::Less,
            None => true,
        };
        if is_best {
            self.champion = Some(self.tours.len());
        }
        self.tours.push(tour);
    }

    /// Returns a copy of the shortest tour. Ties keep the earliest inserted.
    pub fn champion(&self) -> TspResult<Tour<G>> {
        self.require_full()?;
        self.champion
            .map(|best| self.tours[best].clone())
            .ok_or_else(|| TspError::invalid_state("generation has no tours"))
    }

    /// Returns copies of the `k` shortest tours, in no particular order.
    ///
    /// Seeds a max-heap with the first `k` tours, then lets each remaining
    /// tour evict the heap maximum when strictly shorter.
    pub fn k_smallest(&self, k: usize) -> TspResult<Vec<Tour<G>>> {
        if k == 0 || k > self.capacity {
            return Err(TspError::IndexOutOfBounds {
                index: k,
                len: self.capacity + 1,
            });
        }
        self.require_full()?;

        let mut heap: BinaryHeap<ByLength> = self.tours[..k]
            .iter()
            .enumerate()
            .map(|(index, t)| ByLength::new(index, t))
            .collect();
        for (index, tour) in self.tours.iter().enumerate().skip(k) {
            if heap.peek().is_some_and(|top| tour.length() < top.length) {
                heap.pop();
                heap.push(ByLength::new(index, tour));
            }
        }

        Ok(heap
            .into_iter()
            .map(|entry| self.tours[entry.index].clone())
            .collect())
    }

    /// Returns a copy of the tour at `index`.
    pub fn clone_tour(&self, index: usize) -> TspResult<Tour<G>> {
        TspError::check_index(index, self.capacity)?;
        self.tours
            .get(index)
            .cloned()
            .ok_or_else(|| TspError::invalid_state("generation has not been populated"))
    }

    /// Returns the shortest of `t` distinct, uniformly sampled tours.
    ///
    /// Ties keep the first sampled tour.
    pub fn tournament_winner<R: Rng>(&self, t: usize, rng: &mut R) -> TspResult<&Tour<G>> {
        let sample = self.tournament_sample(t, rng)?;
        let mut winner = &self.tours[sample[0]];
        for &index in &sample[1..] {
            let contender = &self.tours[index];
            if contender.cmp_length(winner) == Ordering::Less {
                winner = contender;
            }
        }
        Ok(winner)
    }

    /// Draws `t` distinct indices by partially shuffling `0..P`.
    pub(crate) fn tournament_sample<R: Rng>(&self, t: usize, rng: &mut R) -> TspResult<Vec<usize>> {
        if t == 0 || t > self.capacity {
            return Err(TspError::IndexOutOfBounds {
                index: t,
                len: self.capacity + 1,
            });
        }
        self.require_full()?;

        let p = self.capacity;
        let mut indices: Vec<usize> = (0..p).collect();
        for i in 0..t {
            let j = rng.random_range(i..p);
            indices.swap(i, j);
        }
        indices.truncate(t);
        Ok(indices)
    }

    /// Number of tours a full generation holds.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of tours currently held.
    pub fn len(&self) -> usize {
        self.tours.len()
    }

    /// Returns `true` if no tours are held.
    pub fn is_empty(&self) -> bool {
        self.tours.is_empty()
    }

    /// Returns `true` once all `capacity` slots are occupied.
    pub fn is_full(&self) -> bool {
        self.tours.len() == self.capacity
    }

    /// Length of the tour at `index`.
    pub fn length_at(&self, index: usize) -> TspResult<f64> {
        TspError::check_index(index, self.capacity)?;
        self.tours
            .get(index)
            .map(Tour::length)
            .ok_or_else(|| TspError::invalid_state("generation has not been populated"))
    }

    /// The tours currently held.
    pub fn tours(&self) -> &[Tour<G>] {
        &self.tours
    }

    /// The graph all tours are measured on.
    pub fn graph(&self) -> &Arc<G> {
        &self.graph
    }

    fn require_full(&self) -> TspResult<()> {
        if self.is_full() {
            Ok(())
        } else {
            Err(TspError::invalid_state(format!(
                "generation holds {} of {} tours",
                self.tours.len(),
                self.capacity
            )))
        }
    }
}

/// Heap entry ordered by tour length.
struct ByLength {
    length: f64,
    index: usize,
}

impl ByLength {
    fn new<G>(index: usize, tour: &Tour<G>) -> Self {
        Self {
            length: tour.length,
            index,
        }
    }
}

impl PartialEq for ByLength {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ByLength {}

impl PartialOrd for ByLength {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ByLength {
    fn cmp(&self, other: &Self) -> Ordering {
        self.length
            .total_cmp(&other.length)
            .then(self.index.cmp(&other.index))
    }
}

impl<G> fmt::Display for Generation<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "POPULATION: {}", self.capacity)?;
        let dimension = self.tours.first().map_or(0, |t| t.order.len());
        writeln!(f, "DIMENSION: {dimension}")?;
        writeln!(f, "GENERATION_SECTION")?;
        for i in 0..self.capacity {
            match self.tours.get(i) {
                Some(tour) => writeln!(f, "{i} |{}|", tour.length)?,
                None => writeln!(f, "{i} empty")?,
            }
        }
        Ok(())
    }
}
