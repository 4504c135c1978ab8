use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Local;
use knapsack_ga::{
    config::SurvivorPolicy,
    genes::Gene,
    genetic::Population,
    random::{RandomSource, RngSource},
    roller::{GenerationReport, Roller},
};
use tracing::info;

use crate::{dataset::Dataset, report::RunReport, util};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
enum PolicyArg {
    Elitist,
    Selected,
}

impl From<PolicyArg> for SurvivorPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Elitist => SurvivorPolicy::Elitist,
            PolicyArg::Selected => SurvivorPolicy::Selected,
        }
    }
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SolveArg {
    /// Dataset file to read
    #[arg(short = 'f', long)]
    dataset_file: PathBuf,
    /// Number of best individuals to report
    #[arg(long, default_value_t = 5)]
    top: usize,
    /// Output file path (defaults to a dated file under the report directory)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Directory for dated reports
    #[arg(long, default_value = "report")]
    report_dir: PathBuf,
    /// Override the dataset's survivor policy (elitist or selected)
    #[arg(long)]
    survivor_policy: Option<PolicyArg>,
    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,
}

pub(crate) fn run(arg: &SolveArg) -> anyhow::Result<()> {
    let SolveArg {
        dataset_file,
        top,
        output,
        report_dir,
        survivor_policy,
        seed,
    } = arg;

    let mut dataset = Dataset::open(dataset_file)?;
    if let Some(policy) = survivor_policy {
        dataset.options.survivor_policy = (*policy).into();
    }
    info!(
        path = %dataset_file.display(),
        items = dataset.items.len(),
        "dataset loaded"
    );

    let mut population = match seed {
        Some(seed) => evolve(&dataset, RngSource::seeded(*seed))?,
        None => evolve(&dataset, RngSource::from_os_rng())?,
    };
    population.sort_by_fitness();

    let catalog = dataset.catalog();
    eprintln!("Best Individuals:");
    for (i, ind) in population.iter().take(*top).enumerate() {
        eprintln!(
            "  {i:2}: {} => {:.3} (weight {:.3})",
            format_genes(ind.genes()),
            ind.fitness(),
            ind.total_weight(&catalog),
        );
    }

    let report = RunReport::new(&dataset, &population, *top, Local::now());
    let path = output
        .clone()
        .unwrap_or_else(|| report.dated_path(report_dir));
    util::save_json(&report, Some(path.as_path()))?;

    eprintln!();
    eprintln!("Results saved at: {}", path.display());
    Ok(())
}

fn evolve<R>(dataset: &Dataset, rng: R) -> anyhow::Result<Population>
where
    R: RandomSource,
{
    let mut roller = Roller::new(dataset.catalog(), dataset.config(), rng)
        .context("Invalid dataset options")?;
    while !roller.is_finished() {
        let report = roller.step();
        print_generation(&report);
    }
    Ok(roller.into_population())
}

fn print_generation(report: &GenerationReport) {
    let GenerationReport {
        generation,
        survivors,
        fitness,
        recovered,
    } = report;
    match fitness {
        Some(stats) => eprintln!(
            "Generation #{generation}: {survivors} survivors, fitness min {:.3} / mean {:.3} / max {:.3}",
            stats.min, stats.mean, stats.max,
        ),
        None => eprintln!("Generation #{generation}: {survivors} survivors"),
    }
    if *recovered {
        eprintln!("  Nothing was selected; kept the best individual only");
    }
}

fn format_genes(genes: &[Gene]) -> String {
    genes
        .iter()
        .map(|gene| if gene.is_included() { '1' } else { '0' })
        .collect()
}
