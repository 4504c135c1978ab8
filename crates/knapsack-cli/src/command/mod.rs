use std::io;

use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;

use self::{generate_dataset::GenerateDatasetArg, solve::SolveArg};

mod generate_dataset;
mod solve;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Solve a dataset with the genetic algorithm
    Solve(#[clap(flatten)] SolveArg),
    /// Generate a random dataset
    GenerateDataset(#[clap(flatten)] GenerateDatasetArg),
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(log_level(args.verbose))
        .init();

    match args.mode {
        Mode::Solve(arg) => solve::run(&arg)?,
        Mode::GenerateDataset(arg) => generate_dataset::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition_is_consistent() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_verbose_flag_counts() {
        let args = CommandArgs::try_parse_from(["knapsack", "-vv", "solve", "-f", "data.json"])
            .unwrap();
        assert_eq!(log_level(args.verbose), Level::DEBUG);
        assert!(matches!(args.mode, Mode::Solve(_)));
    }

    #[test]
    fn test_solve_requires_dataset_file() {
        assert!(CommandArgs::try_parse_from(["knapsack", "solve"]).is_err());
    }
}
