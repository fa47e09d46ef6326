//! Generational GA loop.
//!
//! [`GaRunner`] drives the search:
//! initialize → evaluate → (evolve → evaluate) × generations.
//!
//! Initialization seeds the population with one nearest-neighbor tour, one
//! nearest-loneliest-neighbor tour, and shuffled tours for the remaining
//! slots. Each evolve step keeps the elites and breeds the rest by tournament
//! selection, PMX crossover and 2-opt segment reversal mutation.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::config::GaConfig;
use super::generation::Generation;
use crate::constructive::{nearest_loneliest_neighbor, nearest_neighbor};
use crate::distance::{DistanceGraph, DistanceMatrix};
use crate::error::{TspError, TspResult};
use crate::models::Tour;

/// Receives progress messages from a running search.
pub type InfoLogger = Arc<dyn Fn(&str) + Send + Sync>;

/// Runs the genetic search on one graph and keeps the best tour ever found.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_tsp::distance::{DistanceMatrix, Point};
/// use u_tsp::ga::{GaConfig, GaRunner};
///
/// let graph = Arc::new(DistanceMatrix::from_points(&[
///     Point::new(0.0, 0.0),
///     Point::new(1.0, 0.0),
///     Point::new(1.0, 1.0),
///     Point::new(0.0, 1.0),
/// ]));
/// let config = GaConfig::new(50, 8, 2, 3, 0.7, 0.1).unwrap();
///
/// let mut runner = GaRunner::with_seed(graph, config, 42);
/// runner.run().unwrap();
/// assert!((runner.champion().unwrap().length() - 4.0).abs() < 1e-9);
/// ```
pub struct GaRunner<G = DistanceMatrix> {
    graph: Arc<G>,
    config: GaConfig,
    rng: StdRng,
    best: Option<Tour<G>>,
    fitness_history: Vec<f64>,
    logger: Option<InfoLogger>,
}

impl<G: DistanceGraph + Send + Sync> GaRunner<G> {
    /// Creates a runner seeded from OS entropy.
    pub fn new(graph: Arc<G>, config: GaConfig) -> Self {
        Self::with_seed(graph, config, rand::random())
    }

    /// Creates a runner whose whole search is reproducible from `seed`.
    pub fn with_seed(graph: Arc<G>, config: GaConfig, seed: u64) -> Self {
        Self {
            graph,
            config,
            rng: StdRng::seed_from_u64(seed),
            best: None,
            fitness_history: Vec::new(),
            logger: None,
        }
    }

    /// Installs a progress logger.
    pub fn with_logger(mut self, logger: InfoLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Builds a fresh population and evolves it for the configured number of
    /// generations.
    ///
    /// The best-ever tour survives across calls, so repeated runs can only
    /// improve it. The fitness history is reset at the start of each run.
    pub fn run(&mut self) -> TspResult<()> {
        let mut generation = self.initialize()?;
        self.fitness_history.clear();
        self.fitness_history.reserve(self.config.generations() + 1);

        self.evaluate(&generation, 0)?;
        if let Some(best) = &self.best {
            self.log(&format!("initial champion length {:.4}", best.length()));
        }

        for round in 1..=self.config.generations() {
            generation = self.evolve(&generation)?;
            self.evaluate(&generation, round)?;
        }

        if let Some(best) = &self.best {
            self.log(&format!(
                "finished {} generations, best length {:.4}",
                self.config.generations(),
                best.length()
            ));
        }
        Ok(())
    }

    /// The best tour found so far.
    pub fn champion(&self) -> TspResult<&Tour<G>> {
        self.best
            .as_ref()
            .ok_or_else(|| TspError::invalid_state("no search has run yet"))
    }

    /// Re-checks that the champion is a permutation of the graph's vertices.
    pub fn validate_solution(&self) -> TspResult<()> {
        self.champion()?.validate_permutation()
    }

    /// Best-ever length after the initial evaluation and after each round of
    /// the latest run.
    pub fn fitness_history(&self) -> &[f64] {
        &self.fitness_history
    }

    /// The settings this runner was built with.
    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// The graph being searched.
    pub fn graph(&self) -> &Arc<G> {
        &self.graph
    }

    fn initialize(&mut self) -> TspResult<Generation<G>> {
        let population = self.config.population();
        if population < 2 {
            return Err(TspError::invalid_argument(format!(
                "population {population} cannot hold both heuristic seed tours"
            )));
        }

        let mut tours = Vec::with_capacity(population);
        tours.push(nearest_neighbor(&self.graph, &mut self.rng));
        tours.push(nearest_loneliest_neighbor(&self.graph));
        while tours.len() < population {
            let mut tour = Tour::new(Arc::clone(&self.graph));
            tour.shuffle(&mut self.rng);
            tours.push(tour);
        }

        let mut generation = Generation::new(Arc::clone(&self.graph), population);
        generation.populate(tours)?;
        Ok(generation)
    }

    fn evaluate(&mut self, generation: &Generation<G>, round: usize) -> TspResult<()> {
        let champion = generation.champion()?;
        let improved = match &self.best {
            Some(best) => champion.length() < best.length(),
            None => true,
        };
        if improved {
            if round > 0 {
                self.log(&format!(
                    "generation {round}: new best length {:.4}",
                    champion.length()
                ));
            }
            self.best = Some(champion);
        }

        if let Some(best) = &self.best {
            self.fitness_history.push(best.length());
        }
        Ok(())
    }

    fn evolve(&mut self, current: &Generation<G>) -> TspResult<Generation<G>> {
        let population = self.config.population();
        let elite_count = self.config.elite_count();

        let mut tours = if elite_count > 0 {
            current.k_smallest(elite_count)?
        } else {
            Vec::with_capacity(population)
        };
        tours.extend(self.breed_offspring(current, population - elite_count)?);

        let mut next = Generation::new(Arc::clone(&self.graph), population);
        next.populate(tours)?;
        Ok(next)
    }

    #[cfg(not(feature = "parallel"))]
    fn breed_offspring(&mut self, current: &Generation<G>, count: usize) -> TspResult<Vec<Tour<G>>> {
        let config = self.config;
        (0..count)
            .map(|_| breed(current, &config, &mut self.rng))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn breed_offspring(&mut self, current: &Generation<G>, count: usize) -> TspResult<Vec<Tour<G>>> {
        let config = self.config;
        let seeds: Vec<u64> = (0..count).map(|_| self.rng.random()).collect();
        seeds
            .into_par_iter()
            .map(|seed| breed(current, &config, &mut StdRng::seed_from_u64(seed)))
            .collect()
    }

    fn log(&self, message: &str) {
        if let Some(logger) = &self.logger {
            logger(message);
        }
    }
}

/// Produces one offspring from the frozen `current` generation.
fn breed<G: DistanceGraph, R: Rng>(
    current: &Generation<G>,
    config: &GaConfig,
    rng: &mut R,
) -> TspResult<Tour<G>> {
    let fallback = rng.random_range(0..current.capacity());

    let mut child = if rng.random_bool(config.crossover_rate()) {
        let first = current.tournament_winner(config.tournament_size(), rng)?;
        let second = current.tournament_winner(config.tournament_size(), rng)?;
        first.partially_mapped_crossover(second, rng)?
    } else {
        current.clone_tour(fallback)?
    };

    if rng.random_bool(config.mutation_rate()) {
        mutate(&mut child, rng)?;
    }
    Ok(child)
}

/// Reverses the segment between two distinct random positions.
fn mutate<G: DistanceGraph, R: Rng>(tour: &mut Tour<G>, rng: &mut R) -> TspResult<()> {
    let n = tour.size();
    if n < 2 {
        return Ok(());
    }
    let i = rng.random_range(0..n);
    let mut j = rng.random_range(0..n);
    while j == i {
        j = rng.random_range(0..n);
    }
    tour.segment_reversal(i, j)
}
