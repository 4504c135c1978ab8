//! Individuals and populations of knapsack solutions.
//!
//! An [`Individual`] is a gene vector with a cached fitness and a selection
//! flag. A [`Population`] is an ordered collection of individuals that the
//! [`Roller`](crate::roller::Roller) grows and truncates every generation.
//!
//! # Fitness
//!
//! Fitness is the sum of the fitness of every included item. If the included
//! items weigh more than the weight ceiling, [`OVERWEIGHT_PENALTY`] is
//! subtracted once. Fitness is always recomputed from scratch by
//! [`Individual::evaluate`]; genetic operators leave it stale.
//!
//! # Ordering
//!
//! [`Population::sort_by_fitness`] is a stable descending sort. Roulette
//! selection and elitist truncation both rely on equal-fitness individuals
//! keeping their relative order.

use std::{
    ops::{Index, IndexMut},
    slice,
};

use serde::{Deserialize, Serialize};

use crate::{
    catalog::{Catalog, Item},
    genes::{self, Gene},
    random::RandomSource,
    stats::FitnessStats,
};

/// Fitness subtracted from an individual whose items exceed the weight ceiling.
pub const OVERWEIGHT_PENALTY: f64 = 100.0;

/// A single candidate solution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    genes: Vec<Gene>,
    fitness: f64,
    selected: bool,
}

impl Individual {
    /// Creates an unevaluated, unselected individual.
    #[must_use]
    pub fn new(genes: Vec<Gene>) -> Self {
        Self {
            genes,
            fitness: 0.0,
            selected: false,
        }
    }

    /// Creates an individual with `gene_count` uniformly random genes.
    pub fn random<R>(rng: &mut R, gene_count: usize) -> Self
    where
        R: RandomSource + ?Sized,
    {
        Self::new(genes::random(rng, gene_count))
    }

    #[must_use]
    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn set_selected(&mut self, selected: bool) {
        self.selected = selected;
    }

    /// Recomputes fitness against `catalog`.
    #[expect(clippy::cast_precision_loss)]
    pub fn evaluate(&mut self, catalog: &Catalog, weight_ceiling: f64) {
        debug_assert_eq!(self.genes.len(), catalog.len());
        let (fitness, weight) = self
            .included_items(catalog)
            .fold((0.0, 0.0), |(fitness, weight), item| {
                (fitness + item.fitness as f64, weight + item.weight)
            });
        self.fitness = if weight > weight_ceiling {
            fitness - OVERWEIGHT_PENALTY
        } else {
            fitness
        };
    }

    /// Returns the catalog items this individual puts in the knapsack.
    pub fn included_items<'a>(&'a self, catalog: &'a Catalog) -> impl Iterator<Item = &'a Item> {
        self.genes
            .iter()
            .zip(catalog.iter())
            .filter(|(gene, _)| gene.is_included())
            .map(|(_, item)| item)
    }

    #[must_use]
    pub fn total_weight(&self, catalog: &Catalog) -> f64 {
        self.included_items(catalog).map(|item| item.weight).sum()
    }

    /// Produces two children by exchanging up to `max_genes` genes.
    ///
    /// Child A starts as a copy of `self`, child B as a copy of `other`; at each
    /// drawn position their genes are swapped. Parents are left untouched and
    /// children start unselected.
    pub fn crossover<R>(&self, other: &Self, max_genes: usize, rng: &mut R) -> (Self, Self)
    where
        R: RandomSource + ?Sized,
    {
        let mut a = self.clone();
        let mut b = other.clone();
        a.selected = false;
        b.selected = false;
        genes::exchange(&mut a.genes, &mut b.genes, max_genes, rng);
        (a, b)
    }

    /// Flips fewer than `max_flips` random genes in place.
    ///
    /// Fitness is not updated.
    pub fn mutate<R>(&mut self, max_flips: usize, rng: &mut R)
    where
        R: RandomSource + ?Sized,
    {
        genes::flip(&mut self.genes, max_flips, rng);
    }

    pub(crate) fn shift_fitness(&mut self, offset: f64) {
        self.fitness += offset;
    }
}

/// An ordered collection of individuals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    #[must_use]
    pub fn new(individuals: Vec<Individual>) -> Self {
        Self { individuals }
    }

    /// Creates `size` independent random individuals.
    pub fn random<R>(rng: &mut R, size: usize, gene_count: usize) -> Self
    where
        R: RandomSource + ?Sized,
    {
        let individuals = (0..size)
            .map(|_| Individual::random(rng, gene_count))
            .collect();
        Self { individuals }
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    #[must_use]
    pub fn into_individuals(self) -> Vec<Individual> {
        self.individuals
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Individual> {
        self.individuals.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Individual> {
        self.individuals.get_mut(index)
    }

    pub fn iter(&self) -> slice::Iter<'_, Individual> {
        self.individuals.iter()
    }

    pub fn iter_mut(&mut self) -> slice::IterMut<'_, Individual> {
        self.individuals.iter_mut()
    }

    /// Appends individuals, preserving their order.
    pub fn add_all<I>(&mut self, individuals: I)
    where
        I: IntoIterator<Item = Individual>,
    {
        self.individuals.extend(individuals);
    }

    /// Sorts by fitness descending (best first). Stable.
    pub fn sort_by_fitness(&mut self) {
        self.individuals
            .sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
    }

    #[must_use]
    pub fn is_sorted_by_fitness(&self) -> bool {
        self.individuals
            .is_sorted_by(|a, b| a.fitness >= b.fitness)
    }

    /// Evaluates every individual.
    pub fn evaluate(&mut self, catalog: &Catalog, weight_ceiling: f64) {
        for ind in &mut self.individuals {
            ind.evaluate(catalog, weight_ceiling);
        }
    }

    /// Returns the fittest individual, the earliest one among equals.
    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.individuals
            .iter()
            .reduce(|best, ind| if ind.fitness > best.fitness { ind } else { best })
    }

    /// Computes fitness statistics, `None` for an empty population.
    #[must_use]
    pub fn fitness_stats(&self) -> Option<FitnessStats> {
        FitnessStats::new(self.individuals.iter().map(Individual::fitness))
    }

    pub(crate) fn retain_selected(self, limit: usize) -> Self {
        let individuals = self
            .individuals
            .into_iter()
            .filter(Individual::is_selected)
            .take(limit)
            .collect();
        Self { individuals }
    }
}

impl Index<usize> for Population {
    type Output = Individual;

    fn index(&self, index: usize) -> &Self::Output {
        &self.individuals[index]
    }
}

impl IndexMut<usize> for Population {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.individuals[index]
    }
}

impl FromIterator<Individual> for Population {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Individual>,
    {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for Population {
    type Item = Individual;
    type IntoIter = std::vec::IntoIter<Individual>;

    fn into_iter(self) -> Self::IntoIter {
        self.individuals.into_iter()
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Individual;
    type IntoIter = slice::Iter<'a, Individual>;

    fn into_iter(self) -> Self::IntoIter {
        self.individuals.iter()
    }
}

impl<'a> IntoIterator for &'a mut Population {
    type Item = &'a mut Individual;
    type IntoIter = slice::IterMut<'a, Individual>;

    fn into_iter(self) -> Self::IntoIter {
        self.individuals.iter_mut()
    }
}

#[cfg(test)]
#[expect(clippy::float_cmp)]
pub(crate) mod tests {
    use super::*;
    use crate::random::ScriptedSource;

    pub(crate) fn fixture_catalog() -> Catalog {
        Catalog::new(vec![
            Item::new("notebook", 5, 7.0),
            Item::new("tv", 8, 8.0),
            Item::new("ring", 2, 10.0),
            Item::new("videogame", 9, 6.0),
        ])
    }

    pub(crate) fn individual(bits: &[u8]) -> Individual {
        Individual::new(genes::from_bits(bits).unwrap())
    }

    fn bits(ind: &Individual) -> Vec<u8> {
        ind.genes().iter().map(|&g| u8::from(g)).collect()
    }

    mod individual {
        use super::*;

        #[test]
        fn test_random_individual() {
            let mut rng = ScriptedSource::new([0, 1, 0, 1, 1]);
            let ind = Individual::random(&mut rng, 5);
            assert_eq!(ind, individual(&[0, 1, 0, 1, 1]));
            assert_eq!(ind.fitness(), 0.0);
            assert!(!ind.is_selected());
        }

        #[test]
        fn test_evaluation_within_ceiling() {
            let mut ind = individual(&[1, 0, 0, 1]);
            ind.evaluate(&fixture_catalog(), 20.0);
            assert_eq!(ind.fitness(), 14.0);
        }

        #[test]
        fn test_evaluation_with_penalty() {
            let mut ind = individual(&[1, 0, 0, 1]);
            ind.evaluate(&fixture_catalog(), 12.0);
            assert_eq!(ind.fitness(), -86.0);
        }

        #[test]
        fn test_weight_equal_to_ceiling_is_not_penalized() {
            let mut ind = individual(&[1, 0, 0, 1]);
            ind.evaluate(&fixture_catalog(), 13.0);
            assert_eq!(ind.fitness(), 14.0);
        }

        #[test]
        fn test_evaluation_is_idempotent() {
            let catalog = fixture_catalog();
            let mut ind = individual(&[1, 1, 1, 1]);
            ind.evaluate(&catalog, 20.0);
            let first = ind.fitness();
            ind.evaluate(&catalog, 20.0);
            assert_eq!(ind.fitness(), first);
            assert_eq!(first, 24.0 - OVERWEIGHT_PENALTY);
        }

        #[test]
        fn test_evaluation_leaves_genes_and_flag() {
            let mut ind = individual(&[0, 1, 0, 1]);
            ind.set_selected(true);
            ind.evaluate(&fixture_catalog(), 20.0);
            assert_eq!(bits(&ind), [0, 1, 0, 1]);
            assert!(ind.is_selected());
        }

        #[test]
        fn test_clone_owns_its_genes() {
            let original = individual(&[1, 0, 0, 1]);
            let mut copy = original.clone();
            let mut rng = ScriptedSource::new([1, 0]);
            copy.mutate(2, &mut rng);
            assert_eq!(bits(&copy), [0, 0, 0, 1]);
            assert_eq!(bits(&original), [1, 0, 0, 1]);
        }

        #[test]
        fn test_crossover() {
            let p1 = individual(&[1, 0, 0, 1]);
            let mut p2 = individual(&[0, 1, 0, 1]);
            p2.set_selected(true);
            let mut rng = ScriptedSource::new([2, 1, 3]);
            let (c1, c2) = p1.crossover(&p2, 2, &mut rng);

            assert_eq!(bits(&c1), [1, 1, 0, 1]);
            assert_eq!(bits(&c2), [0, 0, 0, 1]);
            assert!(!c1.is_selected());
            assert!(!c2.is_selected());
            assert_eq!(bits(&p1), [1, 0, 0, 1]);
            assert_eq!(bits(&p2), [0, 1, 0, 1]);
        }

        #[test]
        fn test_included_items_and_weight() {
            let catalog = fixture_catalog();
            let ind = individual(&[1, 0, 0, 1]);
            let names: Vec<_> = ind
                .included_items(&catalog)
                .map(|item| item.name.as_str())
                .collect();
            assert_eq!(names, ["notebook", "videogame"]);
            assert_eq!(ind.total_weight(&catalog), 13.0);
        }
    }

    mod population {
        use super::*;

        fn with_fitness(values: &[f64]) -> Population {
            values
                .iter()
                .enumerate()
                .map(|(i, &fitness)| {
                    let mut ind = individual(&[u8::from(i % 2 == 1)]);
                    ind.fitness = fitness;
                    ind
                })
                .collect()
        }

        #[test]
        fn test_random_population() {
            let mut rng = ScriptedSource::new([1, 0, 0, 1, 1, 1]);
            let population = Population::random(&mut rng, 3, 2);
            assert_eq!(population.len(), 3);
            assert!(population.iter().all(|ind| ind.genes().len() == 2));
            assert_eq!(bits(&population[2]), [1, 1]);
        }

        #[test]
        fn test_sort_is_descending_and_stable() {
            let mut population = with_fitness(&[1.0, 3.0, 1.0, 3.0]);
            population.sort_by_fitness();
            let order: Vec<_> = population
                .iter()
                .map(|ind| (ind.fitness(), bits(ind)[0]))
                .collect();
            assert_eq!(order, [(3.0, 1), (3.0, 1), (1.0, 0), (1.0, 0)]);
            assert!(population.is_sorted_by_fitness());
        }

        #[test]
        fn test_sort_keeps_insertion_order_among_ties() {
            let mut population: Population = [
                individual(&[0, 0]),
                individual(&[0, 1]),
                individual(&[1, 0]),
            ]
            .into_iter()
            .collect();
            population.sort_by_fitness();
            assert_eq!(bits(&population[0]), [0, 0]);
            assert_eq!(bits(&population[1]), [0, 1]);
            assert_eq!(bits(&population[2]), [1, 0]);
        }

        #[test]
        fn test_add_all_appends() {
            let mut population = with_fitness(&[1.0]);
            population.add_all([individual(&[1]), individual(&[0])]);
            assert_eq!(population.len(), 3);
            assert_eq!(bits(&population[1]), [1]);
            assert_eq!(bits(&population[2]), [0]);
        }

        #[test]
        fn test_indexed_access_is_mutable() {
            let mut population = with_fitness(&[1.0, 2.0]);
            population[1].set_selected(true);
            if let Some(ind) = population.get_mut(0) {
                ind.mutate(2, &mut ScriptedSource::new([1, 0]));
            }
            assert!(population[1].is_selected());
            assert_eq!(bits(&population[0]), [1]);
        }

        #[test]
        fn test_best_prefers_earliest_among_equals() {
            let population = with_fitness(&[1.0, 5.0, 5.0]);
            let best = population.best().unwrap();
            assert_eq!(best.fitness(), 5.0);
            assert_eq!(bits(best), [1]);
            assert!(Population::default().best().is_none());
        }

        #[test]
        fn test_retain_selected_keeps_insertion_order() {
            let mut population = with_fitness(&[1.0, 2.0, 3.0, 4.0]);
            population[3].set_selected(true);
            population[1].set_selected(true);
            population[0].set_selected(true);
            let survivors = population.retain_selected(2);
            let fitness: Vec<_> = survivors.iter().map(Individual::fitness).collect();
            assert_eq!(fitness, [1.0, 2.0]);
        }

        #[test]
        fn test_fitness_stats() {
            let population = with_fitness(&[1.0, 2.0, 3.0]);
            let stats = population.fitness_stats().unwrap();
            assert_eq!(stats.min, 1.0);
            assert_eq!(stats.max, 3.0);
            assert_eq!(stats.mean, 2.0);
            assert!(Population::default().fitness_stats().is_none());
        }
    }
}
