use anyhow::{Context, Result};

use hgtcov_analysis::{CMatrix, CurveMoments, DiversityMoments};
use hgtcov_sim::prelude::*;

use super::{analyse, Snapshot};
use crate::args::CoalescentArgs;
use crate::config::{self, effective_maxl, CoalescentRun};
use crate::defaults;
use crate::output::{write_curves, DiversityWriter, OutputFiles};
use crate::printing::{print_curves, print_diversity, print_model, print_seed, progress_bar};

pub fn run_coalescent(args: &CoalescentArgs) -> Result<()> {
    println!("🧬 hgtcov - Coalescent Replicates");
    println!("============================================");

    let mut run = CoalescentRun::from_args(args)?;
    run.params.validate().context("Invalid model parameters")?;
    let population = run.params.population;
    run.maxl = effective_maxl(
        run.maxl,
        population.transfer.fragment,
        population.genome_length,
    );
    let seeds = SeedSource::new(run.seed);
    run.seed = Some(seeds.seed());

    print_model(&population);
    println!("\n⏱  Run");
    println!("  • Sample Size: {} [-s, --sample]", run.params.sample_size);
    println!("  • Generation Cap: {} [--cap]", run.params.cap());
    println!("  • Replicates: {} [-r, --reps]", run.replicates);
    println!("  • Max Lag: {} [--maxl]", run.maxl);
    print_seed(seeds.seed());

    let prefix = args
        .output
        .prefix
        .clone()
        .unwrap_or_else(|| defaults::COALESCENT_PREFIX.to_string());
    let files = OutputFiles::new(prefix);
    config::save(&run, &files.config())?;

    let pool = args
        .workers
        .map_or_else(ReplicatePool::available, ReplicatePool::new);
    log::info!(
        "Running {} coalescent replicates on {} workers",
        run.replicates,
        pool.workers()
    );

    let pb = progress_bar(run.replicates as u64, !args.output.no_progress)?;
    let mut d_out = DiversityWriter::create(&files.diversity(), "replicate")?;
    let mut diversity = DiversityMoments::new();
    let mut curves = CurveMoments::new(run.maxl);
    let mut partial = 0usize;

    pool.run(
        run.replicates,
        |replicate| -> Result<(BacktraceOutcome, Snapshot)> {
            let mut coalescent =
                CoalescentSimulation::with_rng(run.params, seeds.stream(replicate as u64))?;
            let (outcome, genomes) = coalescent
                .run()
                .with_context(|| format!("Replicate {replicate}"))?;
            let cmatrix = CMatrix::from_genomes(&genomes)?;
            let snapshot =
                analyse(&cmatrix, run.maxl).with_context(|| format!("Replicate {replicate}"))?;
            Ok((outcome, snapshot))
        },
        |replicate, (outcome, (stats, cov))| {
            if !outcome.is_complete() {
                partial += 1;
            }
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
    if partial > 0 {
        println!(
            "\n⚠️  Warning: {partial} of {} replicates reached the generation cap before coalescing.",
            run.replicates
        );
    }

    println!("\n✓ Coalescent replicates complete!");
    println!("  • {}", files.diversity().display());
    println!("  • {}", files.covariances().display());
    println!("  • {}", files.config().display());
    Ok(())
}
