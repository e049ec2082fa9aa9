mod args;
mod commands;
mod config;
pub mod defaults;
mod output;
mod printing;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::LevelFilter;

use args::{CoalescentArgs, ForwardArgs, TrajectoryArgs};
use commands::{coalescent, forward, trajectory};

/// hgtcov: horizontal gene transfer and the spatial covariance of divergence
///
/// Simulates haploid populations whose genomes change by point mutation and
/// by homologous transfer of contiguous fragments, then measures how pairwise
/// differences cluster along the genome.
#[derive(Parser, Debug)]
#[command(name = "hgtcov")]
#[command(author, version, about = "Simulates bacterial genome divergence under horizontal transfer", long_about = None)]
struct Cli {
    /// Number of threads to use for parallel processing
    ///
    /// If not specified, defaults to the number of logical CPUs.
    #[arg(short = 't', long, global = true)]
    threads: Option<usize>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run independent forward-time replicates.
    ///
    /// Each replicate evolves a clonal population for a fixed number of
    /// generations, then samples it and computes divergence and covariance.
    Forward(Box<ForwardArgs>),

    /// Run independent coalescent replicates.
    ///
    /// Each replicate traces a sample back to its ancestors, then drops
    /// mutations forward along the genealogy.
    Coalescent(Box<CoalescentArgs>),

    /// Follow one forward population over time.
    ///
    /// Records divergence every --step generations.
    Trajectory(Box<TrajectoryArgs>),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    match cli.command {
        Commands::Forward(args) => forward::run_forward(&args)?,
        Commands::Coalescent(args) => coalescent::run_coalescent(&args)?,
        Commands::Trajectory(args) => trajectory::run_trajectory(&args)?,
    }

    Ok(())
}
