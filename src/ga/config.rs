//! GA configuration.
//!
//! [`GaConfig`] holds the six parameters that control the generational loop.
//! It is validated when built, so a value of this type is always usable.

use serde::{Deserialize, Serialize};

use crate::error::{TspError, TspResult};

/// Validated search settings for [`GaRunner`](super::GaRunner).
///
/// # Examples
///
/// ```
/// use u_tsp::ga::GaConfig;
///
/// let config = GaConfig::new(50, 8, 2, 3, 0.7, 0.1).unwrap();
/// assert_eq!(config.population(), 8);
///
/// // elites cannot outnumber the population
/// assert!(GaConfig::new(50, 8, 9, 3, 0.7, 0.1).is_err());
/// ```
///
/// Settings can also be loaded from JSON; the same validation applies.
///
/// ```
/// use u_tsp::ga::GaConfig;
///
/// let json = r#"{
///     "generations": 100,
///     "population": 20,
///     "elite_count": 1,
///     "tournament_size": 3,
///     "crossover_rate": 0.7,
///     "mutation_rate": 0.1
/// }"#;
/// let config = GaConfig::from_json(json).unwrap();
/// assert_eq!(config.generations(), 100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGaConfig")]
pub struct GaConfig {
    generations: usize,
    population: usize,
    elite_count: usize,
    tournament_size: usize,
    crossover_rate: f64,
    mutation_rate: f64,
}

/// Unvalidated mirror of [`GaConfig`] used for deserialization.
#[derive(Deserialize)]
struct RawGaConfig {
    generations: usize,
    population: usize,
    elite_count: usize,
    tournament_size: usize,
    crossover_rate: f64,
    mutation_rate: f64,
}

impl TryFrom<RawGaConfig> for GaConfig {
    type Error = TspError;

    fn try_from(raw: RawGaConfig) -> TspResult<Self> {
        GaConfig::new(
            raw.generations,
            raw.population,
            raw.elite_count,
            raw.tournament_size,
            raw.crossover_rate,
            raw.mutation_rate,
        )
    }
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            generations: 10_000,
            population: 20,
            elite_count: 1,
            tournament_size: 3,
            crossover_rate: 0.7,
            mutation_rate: 0.1,
        }
    }
}

impl GaConfig {
    /// Builds a configuration, rejecting invalid combinations.
    ///
    /// # Arguments
    ///
    /// * `generations`: number of evolve/evaluate rounds
    /// * `population`: tours per generation
    /// * `elite_count`: shortest tours copied unchanged, `0..=population`
    /// * `tournament_size`: tours sampled per tournament, `0..=population`
    /// * `crossover_rate`: probability of PMX per offspring, `[0, 1]`
    /// * `mutation_rate`: probability of a 2-opt mutation per offspring, `[0, 1]`
    pub fn new(
        generations: usize,
        population: usize,
        elite_count: usize,
        tournament_size: usize,
        crossover_rate: f64,
        mutation_rate: f64,
    ) -> TspResult<Self> {
        if elite_count > population {
            return Err(TspError::invalid_argument(format!(
                "elite_count {elite_count} exceeds population {population}"
            )));
        }
        if tournament_size > population {
            return Err(TspError::invalid_argument(format!(
                "tournament_size {tournament_size} exceeds population {population}"
            )));
        }
        check_probability("crossover_rate", crossover_rate)?;
        check_probability("mutation_rate", mutation_rate)?;

        Ok(Self {
            generations,
            population,
            elite_count,
            tournament_size,
            crossover_rate,
            mutation_rate,
        })
    }

    /// Parses and validates a configuration from JSON.
    pub fn from_json(json: &str) -> TspResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| TspError::invalid_argument(format!("bad GA config: {e}")))
    }

    /// Serializes the configuration to JSON.
    pub fn to_json(&self) -> TspResult<String> {
        serde_json::to_string(self)
            .map_err(|e| TspError::invalid_state(format!("cannot serialize GA config: {e}")))
    }

    /// Number of evolve/evaluate rounds.
    pub fn generations(&self) -> usize {
        self.generations
    }

    /// Tours per generation.
    pub fn population(&self) -> usize {
        self.population
    }

    /// Shortest tours carried unchanged into the next generation.
    pub fn elite_count(&self) -> usize {
        self.elite_count
    }

    /// Tours sampled per tournament.
    pub fn tournament_size(&self) -> usize {
        self.tournament_size
    }

    /// Probability of producing an offspring by crossover.
    pub fn crossover_rate(&self) -> f64 {
        self.crossover_rate
    }

    /// Probability of mutating an offspring.
    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }
}

fn check_probability(name: &str, p: f64) -> TspResult<()> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(TspError::invalid_argument(format!(
            "{name} must be within [0, 1], got {p}"
        )))
    }
}

impl std::fmt::Display for GaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "generations={} population={} elites={} tournament={} crossover={} mutation={}",
            self.generations,
            self.population,
            self.elite_count,
            self.tournament_size,
            self.crossover_rate,
            self.mutation_rate
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GaConfig::default();
        assert_eq!(config.generations(), 10_000);
        assert_eq!(config.population(), 20);
        assert_eq!(config.elite_count(), 1);
        assert_eq!(config.tournament_size(), 3);
        assert!((config.crossover_rate() - 0.7).abs() < 1e-10);
        assert!((config.mutation_rate() - 0.1).abs() < 1e-10);
    }

    #[test]
    fn test_new_ok() {
        let config = GaConfig::new(0, 0, 0, 0, 0.0, 1.0).expect("valid");
        assert_eq!(config.population(), 0);
        assert_eq!(config.mutation_rate(), 1.0);
    }

    #[test]
    fn test_rejects_elites_over_population() {
        assert!(matches!(
            GaConfig::new(10, 5, 6, 2, 0.5, 0.5),
            Err(TspError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_rejects_tournament_over_population() {
        assert!(GaConfig::new(10, 5, 1, 6, 0.5, 0.5).is_err());
    }

    #[test]
    fn test_rejects_bad_probabilities() {
        assert!(GaConfig::new(10, 5, 1, 2, 1.5, 0.5).is_err());
        assert!(GaConfig::new(10, 5, 1, 2, 0.5, -0.1).is_err());
        assert!(GaConfig::new(10, 5, 1, 2, f64::NAN, 0.5).is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let config = GaConfig::new(50, 8, 2, 3, 0.7, 0.1).expect("valid");
        let json = config.to_json().expect("serializes");
        assert!(json.contains("\"elite_count\":2"));
        let parsed = GaConfig::from_json(&json).expect("parses");
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_json_validates() {
        let json = r#"{"generations": 1, "population": 2, "elite_count": 3,
                       "tournament_size": 1, "crossover_rate": 0.5, "mutation_rate": 0.5}"#;
        assert!(matches!(
            GaConfig::from_json(json),
            Err(TspError::InvalidArgument(_))
        ));
        assert!(GaConfig::from_json("{}").is_err());
    }
}
