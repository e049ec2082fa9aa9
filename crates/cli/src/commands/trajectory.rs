use anyhow::{bail, Context, Result};

use hgtcov_analysis::CurveMoments;
use hgtcov_sim::prelude::*;

use super::analyse_population;
use crate::args::TrajectoryArgs;
use crate::config::{self, effective_maxl, TrajectoryRun};
use crate::defaults;
use crate::output::{write_curves, DiversityWriter, OutputFiles};
use crate::printing::{print_curves, print_model, print_seed, progress_bar};

/// Follow one forward population and record a snapshot every `step` generations.
pub fn run_trajectory(args: &TrajectoryArgs) -> Result<()> {
    println!("🧬 hgtcov - Forward Trajectory");
    println!("============================================");

    let mut run = TrajectoryRun::from_args(args)?;
    if run.step == 0 {
        bail!("Snapshot step must be at least 1 generation");
    }
    run.maxl = effective_maxl(
        run.maxl,
        run.population.transfer.fragment,
        run.population.genome_length,
    );
    let seeds = SeedSource::new(run.seed);
    run.seed = Some(seeds.seed());

    let mut sim = Simulation::with_rng(run.population, run.initialization, seeds.master())
        .context("Failed to initialize simulation")?;

    print_model(&run.population);
    println!("\n⏱  Run");
    println!("  • Generations: {} [-g, --generations]", run.generations);
    println!("  • Snapshot Every: {} [--step]", run.step);
    match run.pairs {
        Some(pairs) => println!("  • Random Pairs: {pairs} [--pairs]"),
        None => println!("  • Sample Size: {} [-s, --sample]", run.sample),
    }
    println!("  • Max Lag: {} [--maxl]", run.maxl);
    print_seed(seeds.seed());

    let prefix = args
        .output
        .prefix
        .clone()
        .unwrap_or_else(|| defaults::TRAJECTORY_PREFIX.to_string());
    let files = OutputFiles::new(prefix);
    config::save(&run, &files.config())?;

    let pb = progress_bar(run.generations, !args.output.no_progress)?;
    let mut ks_out = DiversityWriter::create(&files.trajectory(), "generation")?;
    let mut curves = CurveMoments::new(run.maxl);
    let mut events = StepSummary::default();

    for generation in 1..=run.generations {
        events += sim
            .step()
            .with_context(|| format!("Generation {generation}"))?;

        if generation % run.step == 0 {
            let (stats, cov) = analyse_population(&mut sim, run.sample, run.pairs, run.maxl)
                .with_context(|| format!("Snapshot at generation {generation}"))?;
            log::debug!("Generation {generation}: ks = {:.4e}", stats.ks);
            ks_out.write(generation, &stats)?;
            curves.increment(&cov)?;
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    ks_out.finish()?;
    write_curves(&files.covariances(), &curves)?;
    log::info!(
        "{} substitutions and {} transfers over {} generations",
        events.mutations,
        events.transfers,
        run.generations
    );

    println!("\n📊 Snapshots: {}", curves.count());
    print_curves(&curves);

    println!("\n✓ Trajectory complete!");
    println!("  • {}", files.trajectory().display());
    println!("  • {}", files.covariances().display());
    println!("  • {}", files.config().display());
    Ok(())
}
