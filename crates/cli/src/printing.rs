use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use hgtcov_analysis::{CurveMoments, DiversityMoments};
use hgtcov_sim::prelude::*;

pub fn print_model(params: &PopulationParams) {
    println!("\n📋 Model");
    println!(
        "  • Population Size: {} [-n, --size]",
        params.population_size
    );
    println!(
        "  • Genome Length: {} sites ({}) [-l, --length]",
        params.genome_length, params.alphabet
    );

    println!("\n⚡ Mutation");
    println!(
        "  • Rate: {:.2e} /site/gen [-m, --mutation]",
        params.mutation.rate
    );
    match params.mutation.model {
        SubstitutionKind::Uniform => println!("  • Model: Uniform"),
        SubstitutionKind::Kimura { kappa } => {
            println!("  • Model: Kimura two-parameter, kappa = {kappa} [--kappa]")
        }
    }

    println!("\n🔀 Transfer");
    let transfer = &params.transfer;
    if transfer.rate == 0.0 {
        println!("  • Disabled");
    } else {
        let unit = match transfer.unit {
            TransferUnit::PerSite => "/site/gen",
            TransferUnit::PerGenome => "/genome/gen",
        };
        println!("  • Rate: {:.2e} {unit} [--transfer]", transfer.rate);
        println!("  • Fragment: {} sites [-f, --fragment]", transfer.fragment);
    }
}

pub fn print_seed(seed: u64) {
    println!("  • Random Seed: {seed} [--seed]");
}

pub fn print_diversity(moments: &DiversityMoments) {
    println!("\n📊 Divergence");
    println!(
        "  • Ks: {:.6e} ± {:.2e} (n = {})",
        moments.ks.mean(),
        moments.ks.standard_error(),
        moments.ks.count()
    );
    if moments.var_d.count() > 0 {
        println!(
            "  • VarD: {:.6e} ± {:.2e}",
            moments.var_d.mean(),
            moments.var_d.standard_error()
        );
    } else {
        println!("  • VarD: undefined (single pair per replicate)");
    }
}

pub fn print_curves(moments: &CurveMoments) {
    if moments.maxl() == 0 {
        return;
    }
    let [scov, rcov, ..] = moments.means();
    let last = moments.maxl() - 1;
    println!("\n📈 Covariance ({} lags)", moments.maxl());
    println!("  • scov[0] = {:.4e}, scov[{last}] = {:.4e}", scov[0], scov[last]);
    println!("  • rcov[0] = {:.4e}, rcov[{last}] = {:.4e}", rcov[0], rcov[last]);
}

/// Progress bar over `len` units, hidden when `show` is false.
pub fn progress_bar(len: u64, show: bool) -> Result<ProgressBar> {
    if !show {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {per_sec}",
            )?
            .progress_chars("#>-"),
    );
    Ok(pb)
}
