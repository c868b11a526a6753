//! Runs Newman-Ziff site percolation from the command line.
//!
//! Single-realization mode prints the largest component size; with
//! `--trace` it prints one `n largest` line per occupied site. Ensemble
//! mode (`--realizations`) prints `p Q(p)` for each requested probability.

use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use site_percolation::collections::RootFinding;
use site_percolation::config::{EnsembleConfig, PercolationConfig};
use site_percolation::ensemble::run_ensemble;
use site_percolation::random::PermutationMethod;
use site_percolation::Result;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RootFindingArg {
    Halving,
    Compression,
}

impl From<RootFindingArg> for RootFinding {
    fn from(arg: RootFindingArg) -> Self {
        match arg {
            RootFindingArg::Halving => RootFinding::Halving,
            RootFindingArg::Compression => RootFinding::Compression,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PermutationArg {
    FisherYates,
    Library,
}

impl From<PermutationArg> for PermutationMethod {
    fn from(arg: PermutationArg) -> Self {
        match arg {
            PermutationArg::FisherYates => PermutationMethod::FisherYates,
            PermutationArg::Library => PermutationMethod::Library,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "percolate")]
#[command(about = "Newman-Ziff site percolation on a toroidal square lattice")]
struct Args {
    /// Linear dimension of the lattice
    #[arg(long, default_value_t = 4)]
    dim: usize,

    /// Random seed (drawn from the OS if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Root-finding strategy
    #[arg(long, value_enum, default_value_t = RootFindingArg::Halving)]
    root_finding: RootFindingArg,

    /// How the occupation order is shuffled
    #[arg(long, value_enum, default_value_t = PermutationArg::FisherYates)]
    permutation: PermutationArg,

    /// Print the largest component size after every occupation
    #[arg(long)]
    trace: bool,

    /// Average this many realizations and print Q(p)
    #[arg(long)]
    realizations: Option<usize>,

    /// Occupation probabilities for ensemble mode
    #[arg(long, num_args = 1.., default_values_t = vec![0.5, 0.55, 0.59, 0.6, 0.65])]
    probabilities: Vec<f64>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let mut config = PercolationConfig::new(args.dim)
        .with_root_finding(args.root_finding.into())
        .with_permutation(args.permutation.into());
    config.seed = args.seed;

    match args.realizations {
        Some(realizations) => {
            let mut ensemble_config = EnsembleConfig::new(config, realizations);
            // pin the seed so it can be reported
            let seed = ensemble_config.base_seed();
            ensemble_config.percolation.seed = Some(seed);
            let ensemble = run_ensemble(&ensemble_config)?;
            println!("# dim {} realizations {realizations} seed {seed}", args.dim);
            for &p in &args.probabilities {
                println!("{p} {}", ensemble.q_of_p(p)?);
            }
        }
        None => {
            let run = config.run()?;
            if args.trace {
                for (n, big) in run.trajectory.iter().enumerate().skip(1) {
                    println!("{n} {big}");
                }
            } else {
                println!(
                    "largest component: {} of {} sites",
                    run.largest_component_size,
                    run.pointers.len()
                );
            }
        }
    }
    Ok(())
}
