use anyhow::{Context, Result};

use hgtcov_analysis::{CurveMoments, DiversityMoments};
use hgtcov_sim::prelude::*;

use super::{analyse_population, Snapshot};
use crate::args::ForwardArgs;
use crate::config::{self, effective_maxl, ForwardRun};
use crate::defaults;
use crate::output::{write_curves, DiversityWriter, OutputFiles};
use crate::printing::{print_curves, print_diversity, print_model, print_seed, progress_bar};

pub fn run_forward(args: &ForwardArgs) -> Result<()> {
    println!("🧬 hgtcov - Forward Replicates");
    println!("============================================");

    let mut run = ForwardRun::from_args(args)?;
    run.population
        .validate()
        .context("Invalid model parameters")?;
    run.maxl = effective_maxl(
        run.maxl,
        run.population.transfer.fragment,
        run.population.genome_length,
    );
    let seeds = SeedSource::new(run.seed);
    run.seed = Some(seeds.seed());

    print_model(&run.population);
    println!("\n⏱  Run");
    println!("  • Generations: {} [-g, --generations]", run.generations);
    match run.pairs {
        Some(pairs) => println!("  • Random Pairs: {pairs} [--pairs]"),
        None => println!("  • Sample Size: {} [-s, --sample]", run.sample),
    }
    println!("  • Replicates: {} [-r, --reps]", run.replicates);
    println!("  • Max Lag: {} [--maxl]", run.maxl);
    print_seed(seeds.seed());

    let prefix = args
        .output
        .prefix
        .clone()
        .unwrap_or_else(|| defaults::FORWARD_PREFIX.to_string());
    let files = OutputFiles::new(prefix);
    config::save(&run, &files.config())?;

    let pool = args
        .workers
        .map_or_else(ReplicatePool::available, ReplicatePool::new);
    log::info!(
        "Running {} forward replicates on {} workers",
        run.replicates,
        pool.workers()
    );

    let pb = progress_bar(run.replicates as u64, !args.output.no_progress)?;
    let mut d_out = DiversityWriter::create(&files.diversity(), "replicate")?;
    let mut diversity = DiversityMoments::new();
    let mut curves = CurveMoments::new(run.maxl);

    pool.run(
        run.replicates,
        |replicate| -> Result<Snapshot> {
            let mut sim = Simulation::with_rng(
                run.population,
                run.initialization,
                seeds.stream(replicate as u64),
            )?;
            sim.advance(run.generations)
                .with_context(|| format!("Replicate {replicate}"))?;
            analyse_population(&mut sim, run.sample, run.pairs, run.maxl)
                .with_context(|| format!("Replicate {replicate}"))
        },
        |replicate, (stats, cov)| {
            d_out.write(replicate as u64, &stats)?;
            diversity.increment(&stats);
            curves.increment(&cov)?;
            pb.inc(1);
            Ok(())
        },
    )?;
    pb.finish_and_clear();

    d_out.finish()?;
    write_curves(&files.covariances(), &curves)?;

    print_diversity(&diversity);
    print_curves(&curves);

    println!("\n✓ Forward replicates complete!");
    println!("  • {}", files.diversity().display());
    println!("  • {}", files.covariances().display());
    println!("  • {}", files.config().display());
    Ok(())
}
