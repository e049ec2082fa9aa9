use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hgtcov_analysis::{pairwise_differences, CMatrix};
use hgtcov_sim::prelude::*;
use rand::SeedableRng;

/// Sample of `n` genomes of `length` sites around a common ancestor.
fn sample(n: usize, length: usize) -> Vec<Genome> {
    let mut rng = SimRng::seed_from_u64(42);
    let model = SubstitutionModel::uniform(0.01, Alphabet::Dna).unwrap();
    let ancestor = Genome::random(length, Alphabet::Dna, &mut rng);
    (0..n)
        .map(|_| {
            let mut g = ancestor.clone();
            model.mutate_genome(&mut g, &mut rng);
            g
        })
        .collect()
}

fn bench_pairwise_differences(c: &mut Criterion) {
    let mut group = c.benchmark_group("pairwise_differences");
    for n in [10, 50] {
        let genomes = sample(n, 10_000);
        group.throughput(Throughput::Elements((n * (n - 1) / 2) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &genomes, |b, g| {
            b.iter(|| black_box(pairwise_differences(black_box(g)).unwrap()))
        });
    }
    group.finish();
}

fn bench_cov_circle(c: &mut Criterion) {
    let mut group = c.benchmark_group("cov_circle");
    let cm = CMatrix::from_genomes(&sample(20, 10_000)).unwrap();
    for maxl in [100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(maxl), &maxl, |b, &maxl| {
            b.iter(|| black_box(cm.cov_circle(black_box(maxl)).unwrap()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_pairwise_differences, bench_cov_circle);
criterion_main!(benches);
