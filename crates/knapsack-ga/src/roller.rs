//! The generational loop.
//!
//! A [`Roller`] owns the catalog, the configuration, the population and the
//! random source. Each call to [`Roller::step`] runs one generation:
//!
//! 1. **Evaluate** - recompute every individual's fitness
//! 2. **Select** - roulette-wheel draws flag parents
//! 3. **Crossover** - flagged parents are paired and their children appended
//! 4. **Mutate** - a few random individuals get random gene flips
//! 5. **Re-evaluate** - children and mutants get a fresh fitness
//! 6. **Truncate** - the grown population is cut back to `population_size`
//!
//! There is no convergence check; [`Roller::run`] stops after exactly
//! `max_generations` generations.
//!
//! # Roulette selection
//!
//! Negative fitness is shifted up so the worst individual sits at zero, the
//! population is sorted best first and a cumulative sum is built. Each draw is
//! an integer in `[0, total]`; the first individual whose cumulative sum
//! reaches the draw is flagged. The same individual can be drawn twice but is
//! flagged once, so fewer than `selection_size` parents may be flagged.
//!
//! When the total is zero every draw falls back to a uniform pick.
//!
//! # Truncation
//!
//! See [`SurvivorPolicy`]. Under [`SurvivorPolicy::Selected`], a generation in
//! which nothing is flagged keeps the best individual alone rather than
//! leaving the population empty; [`GenerationReport::recovered`] records it.

use std::mem;

use tracing::{debug, warn};

use crate::{
    catalog::Catalog,
    config::{Config, ConfigError, SurvivorPolicy},
    genetic::{Individual, Population},
    random::{self, RandomSource},
    stats::FitnessStats,
};

/// Summary of one completed generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationReport {
    /// Number of generations completed so far (1-based)
    pub generation: usize,
    /// Population size after truncation
    pub survivors: usize,
    /// Fitness of the surviving population
    pub fitness: Option<FitnessStats>,
    /// Whether truncation had to fall back to the best individual
    pub recovered: bool,
}

/// Drives the genetic algorithm over a catalog.
#[derive(Debug)]
pub struct Roller<R> {
    catalog: Catalog,
    config: Config,
    population: Population,
    generation: usize,
    rng: R,
}

impl<R> Roller<R>
where
    R: RandomSource,
{
    /// Validates `config` and creates a random initial population.
    pub fn new(catalog: Catalog, config: Config, mut rng: R) -> Result<Self, ConfigError> {
        config.validate(catalog.len())?;
        let population =
            Population::random(&mut rng, config.options.population_size, catalog.len());
        Ok(Self {
            catalog,
            config,
            population,
            generation: 0,
            rng,
        })
    }

    /// Validates `config` and starts from an existing population.
    pub fn with_population(
        catalog: Catalog,
        config: Config,
        population: Population,
        rng: R,
    ) -> Result<Self, ConfigError> {
        config.validate(catalog.len())?;
        if population.is_empty() {
            return Err(ConfigError::EmptyPopulation);
        }
        if let Some(ind) = population
            .iter()
            .find(|ind| ind.genes().len() != catalog.len())
        {
            return Err(ConfigError::GeneCountMismatch {
                expected: catalog.len(),
                actual: ind.genes().len(),
            });
        }
        Ok(Self {
            catalog,
            config,
            population,
            generation: 0,
            rng,
        })
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Number of completed generations.
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.generation >= self.config.options.max_generations
    }

    #[must_use]
    pub fn into_population(self) -> Population {
        self.population
    }

    /// Runs the remaining generations and returns the final population.
    #[must_use]
    pub fn run(mut self) -> Population {
        while !self.is_finished() {
            self.step();
        }
        self.population
    }

    /// Runs one full generation.
    pub fn step(&mut self) -> GenerationReport {
        self.evaluate_population();
        self.select_population();
        self.crossover_population();
        self.mutate_population();
        self.evaluate_population();
        let recovered = self.truncate_population();
        self.generation += 1;

        let report = GenerationReport {
            generation: self.generation,
            survivors: self.population.len(),
            fitness: self.population.fitness_stats(),
            recovered,
        };
        debug!(
            generation = report.generation,
            survivors = report.survivors,
            best = report.fitness.map(|s| s.max),
            mean = report.fitness.map(|s| s.mean),
            "generation completed"
        );
        report
    }

    pub fn evaluate_population(&mut self) {
        self.population
            .evaluate(&self.catalog, self.config.weight_ceiling);
    }

    /// Flags parents by roulette-wheel selection.
    ///
    /// Leaves the population sorted by (shifted) fitness, best first.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn select_population(&mut self) {
        let population = &mut self.population;
        for ind in population.iter_mut() {
            ind.set_selected(false);
        }

        let Some(min) = population.iter().map(Individual::fitness).reduce(f64::min) else {
            return;
        };
        if min < 0.0 {
            for ind in population.iter_mut() {
                ind.shift_fitness(-min);
            }
        }
        population.sort_by_fitness();

        let cumulative: Vec<f64> = population
            .iter()
            .scan(0.0, |sum, ind| {
                *sum += ind.fitness();
                Some(*sum)
            })
            .collect();
        // draws are taken from `0..=total`, so keep `total + 1` representable
        let total = cumulative.last().copied().unwrap_or(0.0).floor() as usize;
        let total = total.min(usize::MAX - 1);
        if total == 0 {
            warn!(
                population = population.len(),
                "total fitness is zero, selecting uniformly"
            );
        }

        for _ in 0..self.config.options.selection_size {
            let index = if total == 0 {
                self.rng.below(population.len())
            } else {
                let draw = self.rng.below(total + 1) as f64;
                cumulative
                    .iter()
                    .position(|&sum| sum >= draw)
                    .unwrap_or(cumulative.len() - 1)
            };
            population[index].set_selected(true);
        }
    }

    /// Pairs flagged individuals and appends their children.
    ///
    /// An odd number of parents is made even by repeating the fittest one.
    pub fn crossover_population(&mut self) {
        let mut parents: Vec<Individual> = self
            .population
            .iter()
            .filter(|ind| ind.is_selected())
            .cloned()
            .collect();
        if parents.len() % 2 == 1 {
            parents.sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));
            parents.push(parents[0].clone());
        }
        random::shuffle(&mut parents, &mut self.rng);

        let max_genes = self.config.options.max_crossover_genes;
        let mut children = Vec::with_capacity(parents.len());
        for pair in parents.chunks_exact(2) {
            let (a, b) = pair[0].crossover(&pair[1], max_genes, &mut self.rng);
            children.push(a);
            children.push(b);
        }
        self.population.add_all(children);
    }

    /// Mutates fewer than `max_mutation_individuals` random individuals.
    pub fn mutate_population(&mut self) {
        let max_individuals = self.config.options.max_mutation_individuals;
        if max_individuals == 0 || self.population.is_empty() {
            return;
        }
        let max_genes = self.config.options.max_mutation_genes;
        let count = self.rng.below(max_individuals);
        for _ in 0..count {
            let index = self.rng.below(self.population.len());
            self.population[index].mutate(max_genes, &mut self.rng);
        }
    }

    /// Replaces the population with at most `population_size` survivors.
    ///
    /// Returns `true` if nothing survived and the best individual was kept
    /// instead.
    pub fn truncate_population(&mut self) -> bool {
        let limit = self.config.options.population_size;
        let mut grown = mem::take(&mut self.population);
        if grown.is_empty() {
            return false;
        }

        let mut recovered = false;
        self.population = match self.config.options.survivor_policy {
            SurvivorPolicy::Elitist => {
                grown.sort_by_fitness();
                grown.into_iter().take(limit).collect()
            }
            SurvivorPolicy::Selected if grown.iter().any(Individual::is_selected) => {
                grown.retain_selected(limit)
            }
            SurvivorPolicy::Selected => {
                warn!(
                    generation = self.generation,
                    "no individual selected, keeping the best one"
                );
                recovered = true;
                grown.best().cloned().into_iter().collect()
            }
        };
        recovered
    }
}
