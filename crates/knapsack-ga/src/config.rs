//! Evolution parameters and their validation.
//!
//! [`EvolutionOptions`] holds the tunable parameters of the generational loop and
//! deserializes with per-field defaults, so a dataset file may specify only
//! the options it cares about. [`Config`] pairs the options with the weight
//! ceiling of the problem.
//!
//! Cross-field invariants depend on the catalog size and are checked by
//! [`Config::validate`], which [`Roller`](crate::roller::Roller) calls before
//! it creates a population.

use serde::{Deserialize, Serialize};

/// How the grown population is cut back to `population_size` at the end of a
/// generation.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurvivorPolicy {
    /// Keep the fittest individuals of parents and children combined.
    #[default]
    Elitist,
    /// Keep only individuals flagged by roulette selection, in insertion order.
    ///
    /// Children are never flagged, so this discards every child.
    Selected,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvolutionOptions {
    /// Number of roulette draws per generation
    pub selection_size: usize,
    /// Number of generations to run
    pub max_generations: usize,
    /// Population size after initialization and after every truncation
    pub population_size: usize,
    /// Upper bound (inclusive) of gene exchanges per crossover
    pub max_crossover_genes: usize,
    /// Upper bound (exclusive) of individuals mutated per generation
    pub max_mutation_individuals: usize,
    /// Upper bound (exclusive) of gene flips per mutation
    pub max_mutation_genes: usize,
    pub survivor_policy: SurvivorPolicy,
}

impl Default for EvolutionOptions {
    fn default() -> Self {
        Self {
            selection_size: 10,
            max_generations: 100,
            population_size: 50,
            max_crossover_genes: 2,
            max_mutation_individuals: 5,
            max_mutation_genes: 2,
            survivor_policy: SurvivorPolicy::default(),
        }
    }
}

/// Complete configuration of one optimization run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Total weight above which an individual is penalized
    pub weight_ceiling: f64,
    pub options: EvolutionOptions,
}

impl Config {
    #[must_use]
    pub fn new(weight_ceiling: f64, options: EvolutionOptions) -> Self {
        Self {
            weight_ceiling,
            options,
        }
    }

    /// Checks the configuration against a catalog of `gene_count` items.
    pub fn validate(&self, gene_count: usize) -> Result<(), ConfigError> {
        let EvolutionOptions {
            selection_size,
            population_size,
            max_crossover_genes,
            max_mutation_genes,
            ..
        } = self.options;

        if !self.weight_ceiling.is_finite() {
            return Err(ConfigError::NonFiniteWeightCeiling {
                weight_ceiling: self.weight_ceiling,
            });
        }
        if selection_size == 0 {
            return Err(ConfigError::ZeroSelectionSize);
        }
        if population_size == 0 {
            return Err(ConfigError::ZeroPopulationSize);
        }
        if max_crossover_genes > gene_count {
            return Err(ConfigError::CrossoverGenesExceedGeneCount {
                max_crossover_genes,
                gene_count,
            });
        }
        if max_mutation_genes > gene_count {
            return Err(ConfigError::MutationGenesExceedGeneCount {
                max_mutation_genes,
                gene_count,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("weight ceiling must be finite, got {weight_ceiling}")]
    NonFiniteWeightCeiling { weight_ceiling: f64 },
    #[display("selection size must be at least 1")]
    ZeroSelectionSize,
    #[display("population size must be at least 1")]
    ZeroPopulationSize,
    #[display("max crossover genes ({max_crossover_genes}) exceeds gene count ({gene_count})")]
    CrossoverGenesExceedGeneCount {
        max_crossover_genes: usize,
        gene_count: usize,
    },
    #[display("max mutation genes ({max_mutation_genes}) exceeds gene count ({gene_count})")]
    MutationGenesExceedGeneCount {
        max_mutation_genes: usize,
        gene_count: usize,
    },
    #[display("individual has {actual} genes but the catalog has {expected} items")]
    GeneCountMismatch { expected: usize, actual: usize },
    #[display("initial population is empty")]
    EmptyPopulation,
}
