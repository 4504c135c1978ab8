use std::path::PathBuf;

use anyhow::Context as _;
use knapsack_ga::{catalog::Item, config::EvolutionOptions};
use rand::{Rng, SeedableRng as _};
use rand_distr::Normal;
use rand_pcg::Pcg32;
use tracing::info;

use crate::{dataset::Dataset, util};

const MIN_WEIGHT: f64 = 0.1;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GenerateDatasetArg {
    /// Number of items to generate
    #[arg(long, default_value_t = 20)]
    items: usize,
    /// Weight ceiling (defaults to half of the total item weight)
    #[arg(long)]
    expected_weight: Option<f64>,
    /// Item fitness is drawn uniformly from 1 to this value
    #[arg(long, default_value_t = 10)]
    max_fitness: i64,
    /// Mean of the normal distribution item weights are drawn from
    #[arg(long, default_value_t = 5.0)]
    mean_weight: f64,
    /// Standard deviation of item weights
    #[arg(long, default_value_t = 2.0)]
    weight_std_dev: f64,
    /// Seed for a reproducible dataset
    #[arg(long)]
    seed: Option<u64>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &GenerateDatasetArg) -> anyhow::Result<()> {
    let items = match arg.seed {
        Some(seed) => generate_items(arg, &mut Pcg32::seed_from_u64(seed))?,
        None => generate_items(arg, &mut rand::rng())?,
    };
    let total_weight: f64 = items.iter().map(|item| item.weight).sum();
    let expected_weight = arg.expected_weight.unwrap_or(total_weight / 2.0);

    // gene bounds must fit the catalog
    let defaults = EvolutionOptions::default();
    let options = EvolutionOptions {
        max_crossover_genes: defaults.max_crossover_genes.min(items.len()),
        max_mutation_genes: defaults.max_mutation_genes.min(items.len()),
        ..defaults
    };

    let dataset = Dataset {
        expected_weight,
        options,
        items,
    };
    util::save_json(&dataset, arg.output.as_deref())?;
    info!(
        items = dataset.items.len(),
        total_weight, expected_weight, "dataset generated"
    );
    Ok(())
}

fn generate_items<R>(arg: &GenerateDatasetArg, rng: &mut R) -> anyhow::Result<Vec<Item>>
where
    R: Rng + ?Sized,
{
    anyhow::ensure!(
        arg.max_fitness >= 1,
        "max fitness must be at least 1, got {}",
        arg.max_fitness
    );
    anyhow::ensure!(
        arg.weight_std_dev >= 0.0,
        "weight standard deviation must not be negative, got {}",
        arg.weight_std_dev
    );
    let weights = Normal::new(arg.mean_weight, arg.weight_std_dev)
        .context("Invalid item weight distribution")?;

    let items = (0..arg.items)
        .map(|i| {
            let fitness = rng.random_range(1..=arg.max_fitness);
            let weight = rng.sample(weights).max(MIN_WEIGHT);
            // two decimals keep the dataset readable
            let weight = (weight * 100.0).round() / 100.0;
            Item::new(format!("item-{i:03}"), fitness, weight)
        })
        .collect();
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arg() -> GenerateDatasetArg {
        GenerateDatasetArg {
            items: 50,
            expected_weight: None,
            max_fitness: 10,
            mean_weight: 5.0,
            weight_std_dev: 4.0,
            seed: Some(1),
            output: None,
        }
    }

    #[test]
    fn test_generated_items_respect_bounds() {
        let items = generate_items(&arg(), &mut Pcg32::seed_from_u64(1)).unwrap();
        assert_eq!(items.len(), 50);
        assert_eq!(items[7].name, "item-007");
        for item in &items {
            assert!((1..=10).contains(&item.fitness));
            assert!(item.weight >= MIN_WEIGHT);
        }
    }

    #[test]
    fn test_same_seed_same_items() {
        let a = generate_items(&arg(), &mut Pcg32::seed_from_u64(9)).unwrap();
        let b = generate_items(&arg(), &mut Pcg32::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_invalid_parameters() {
        let mut bad = arg();
        bad.max_fitness = 0;
        assert!(generate_items(&bad, &mut rand::rng()).is_err());

        let mut bad = arg();
        bad.weight_std_dev = -1.0;
        assert!(generate_items(&bad, &mut rand::rng()).is_err());
    }
}
