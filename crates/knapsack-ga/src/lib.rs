//! Genetic algorithm for the 0/1 knapsack problem.
//!
//! Given a [`Catalog`](catalog::Catalog) of items (each with a fitness and a
//! weight) and a weight ceiling, this crate searches for a subset of items that
//! maximizes total fitness without exceeding the ceiling. A subset is encoded as
//! a binary gene vector: gene `i` includes or excludes item `i`.
//!
//! # How It Works
//!
//! 1. **Population** - Create random gene vectors
//! 2. **Evaluation** - Sum the fitness of included items, penalizing overweight ones
//! 3. **Selection** - Flag parents with roulette-wheel selection
//! 4. **Crossover** - Pair parents and exchange random genes
//! 5. **Mutation** - Flip random genes of random individuals
//! 6. **Truncation** - Cut the population back to its configured size
//! 7. **Repeat** - For a fixed number of generations
//!
//! # Architecture
//!
//! ```text
//! Catalog + Config
//!     ↓ validated by
//! Roller (generational loop)
//!     ↓ owns
//! Population → Individual → [Gene]
//!     ↓ every draw from
//! RandomSource
//! ```
//!
//! # Example
//!
//! ```
//! use knapsack_ga::{
//!     catalog::{Catalog, Item},
//!     config::{Config, EvolutionOptions},
//!     random::RngSource,
//!     roller::Roller,
//! };
//!
//! let catalog = Catalog::new(vec![
//!     Item::new("notebook", 5, 7.0),
//!     Item::new("tv", 8, 8.0),
//!     Item::new("ring", 2, 10.0),
//!     Item::new("videogame", 9, 6.0),
//! ]);
//! let options = EvolutionOptions {
//!     max_generations: 10,
//!     population_size: 8,
//!     selection_size: 4,
//!     ..EvolutionOptions::default()
//! };
//! let roller = Roller::new(catalog, Config::new(20.0, options), RngSource::seeded(1))?;
//!
//! let mut population = roller.run();
//! population.sort_by_fitness();
//! assert!(population.len() <= 8);
//! # Ok::<(), knapsack_ga::config::ConfigError>(())
//! ```
//!
//! # Randomness
//!
//! Every random decision goes through [`random::RandomSource`]. Production
//! runs use [`random::RngSource::from_os_rng`]; reproducible runs use
//! [`random::RngSource::seeded`].
//!
//! # Current Limitations
//!
//! - **Single objective**: fitness is one scalar; there are no Pareto fronts
//! - **Fixed budget**: no convergence detection or early exit
//! - **Fixed parameters**: bounds do not adapt across generations
//! - **Sequential**: evaluation runs on one thread

pub mod catalog;
pub mod config;
pub mod genes;
pub mod genetic;
pub mod random;
pub mod roller;
pub mod stats;
