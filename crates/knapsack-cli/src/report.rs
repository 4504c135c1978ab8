use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone};
use knapsack_ga::{
    catalog::Catalog,
    config::EvolutionOptions,
    genes::Gene,
    genetic::{Individual, Population},
};
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;

/// Result of one run: the best individuals of the final population.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunReport {
    pub generated_at: DateTime<Local>,
    pub expected_weight: f64,
    pub dataset_options: EvolutionOptions,
    pub results: Vec<ReportedIndividual>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportedIndividual {
    pub genes: Vec<Gene>,
    pub fitness: f64,
    pub selected: bool,
    pub total_weight: f64,
    /// Names of the included items
    pub items: Vec<String>,
}

impl ReportedIndividual {
    fn new(individual: &Individual, catalog: &Catalog) -> Self {
        Self {
            genes: individual.genes().to_vec(),
            fitness: individual.fitness(),
            selected: individual.is_selected(),
            total_weight: individual.total_weight(catalog),
            items: individual
                .included_items(catalog)
                .map(|item| item.name.clone())
                .collect(),
        }
    }
}

impl RunReport {
    /// Builds a report of the first `top` individuals of `population`.
    ///
    /// `population` is expected to be sorted best first.
    pub fn new(
        dataset: &Dataset,
        population: &Population,
        top: usize,
        generated_at: DateTime<Local>,
    ) -> Self {
        let catalog = dataset.catalog();
        Self {
            generated_at,
            expected_weight: dataset.expected_weight,
            dataset_options: dataset.options,
            results: population
                .iter()
                .take(top)
                .map(|ind| ReportedIndividual::new(ind, &catalog))
                .collect(),
        }
    }

    /// Dated path under `report_dir` matching [`Self::generated_at`].
    #[must_use]
    pub fn dated_path(&self, report_dir: &Path) -> PathBuf {
        dated_path(report_dir, &self.generated_at)
    }
}

/// Returns `<report_dir>/<date>/<date>_<time>.json` for `at`.
pub fn dated_path<Tz>(report_dir: &Path, at: &DateTime<Tz>) -> PathBuf
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    report_dir
        .join(at.format("%Y-%m-%d").to_string())
        .join(at.format("%Y-%m-%d_%H-%M-%S.json").to_string())
}

#[cfg(test)]
#[expect(clippy::float_cmp)]
mod tests {
    use chrono::Utc;
    use knapsack_ga::{catalog::Item, genes};

    use super::*;

    fn dataset() -> Dataset {
        Dataset {
            expected_weight: 20.0,
            options: EvolutionOptions::default(),
            items: vec![
                Item::new("notebook", 5, 7.0),
                Item::new("tv", 8, 8.0),
                Item::new("ring", 2, 10.0),
                Item::new("videogame", 9, 6.0),
            ],
        }
    }

    fn population(dataset: &Dataset) -> Population {
        let mut population: Population = [[1u8, 0, 0, 1], [0, 1, 0, 1], [0, 0, 1, 0]]
            .iter()
            .map(|bits| Individual::new(genes::from_bits(bits).unwrap()))
            .collect();
        population.evaluate(&dataset.catalog(), dataset.expected_weight);
        population.sort_by_fitness();
        population
    }

    #[test]
    fn test_dated_path() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            dated_path(Path::new("report"), &at),
            Path::new("report/2024-03-09/2024-03-09_14-05-07.json")
        );
    }

    #[test]
    fn test_report_path_follows_timestamp() {
        let dataset = dataset();
        let population = population(&dataset);
        let at = Local.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        let report = RunReport::new(&dataset, &population, 1, at);
        assert_eq!(
            report.dated_path(Path::new("report")),
            Path::new("report/2024-12-31/2024-12-31_23-59-59.json")
        );
    }

    #[test]
    fn test_report_takes_top_individuals() {
        let dataset = dataset();
        let population = population(&dataset);
        let report = RunReport::new(&dataset, &population, 2, Local::now());

        assert_eq!(report.results.len(), 2);
        let best = &report.results[0];
        assert_eq!(best.fitness, 17.0);
        assert_eq!(best.total_weight, 14.0);
        assert_eq!(best.items, ["tv", "videogame"]);
        assert_eq!(report.results[1].fitness, 14.0);
    }

    #[test]
    fn test_report_json_layout() {
        let dataset = dataset();
        let population = population(&dataset);
        let report = RunReport::new(&dataset, &population, 1, Local::now());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["expected_weight"], 20.0);
        assert_eq!(json["dataset_options"]["survivor_policy"], "elitist");
        assert_eq!(json["results"][0]["genes"], serde_json::json!([0, 1, 0, 1]));
        assert_eq!(json["results"][0]["selected"], false);
    }
}
