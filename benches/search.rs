use criterion::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use vpindex::{Point, VPTree, VPTreeBuilder, VantageSelection, L1, L2};

fn random_points(rng: &mut StdRng, cardinality: usize, dimensionality: usize) -> Vec<Point<f32>> {
    (0..cardinality)
        .map(|id| Point::new((0..dimensionality).map(|_| rng.gen_range(-1.0..1.0)).collect(), id))
        .collect()
}

fn build(c: &mut Criterion) {
    let seed = 42;
    let mut rng = StdRng::seed_from_u64(seed);
    let data = random_points(&mut rng, 10_000, 10);

    let mut group = c.benchmark_group("build");
    group.sample_size(10);
    for selection in [VantageSelection::Random, VantageSelection::FarthestFromCentroid] {
        let id = BenchmarkId::new(format!("{selection:?}"), data.len());
        group.bench_with_input(id, &data, |b, data| {
            b.iter_with_large_drop(|| {
                VPTreeBuilder::new(L2)
                    .selection(selection)
                    .seed(seed)
                    .build(data.clone())
            });
        });
    }
    group.finish();
}

fn search(c: &mut Criterion) {
    let seed = 42;
    let mut rng = StdRng::seed_from_u64(seed);
    let data = random_points(&mut rng, 100_000, 10);
    let queries = random_points(&mut rng, 100, 10);

    let tree = VPTreeBuilder::new(L2).seed(seed).build(data.clone()).unwrap();
    let l1_tree = VPTree::new(data, L1).unwrap();

    let mut group = c.benchmark_group("search");
    group
        .sample_size(10)
        .throughput(Throughput::Elements(queries.len() as u64));

    for k in (0..=6).map(|v| 2usize.pow(v)) {
        group.bench_with_input(BenchmarkId::new("knn-l2", k), &k, |b, &k| {
            b.iter_with_large_drop(|| {
                queries
                    .iter()
                    .map(|q| tree.search_knn(q, k))
                    .collect::<Vec<_>>()
            });
        });
        group.bench_with_input(BenchmarkId::new("knn-l1", k), &k, |b, &k| {
            b.iter_with_large_drop(|| {
                queries
                    .iter()
                    .map(|q| l1_tree.search_knn(q, k))
                    .collect::<Vec<_>>()
            });
        });
    }

    for radius in [0.1f32, 0.25, 0.5] {
        group.bench_with_input(BenchmarkId::new("range-l2", radius), &radius, |b, &radius| {
            b.iter_with_large_drop(|| {
                queries
                    .iter()
                    .map(|q| tree.search_range(q, radius))
                    .collect::<Vec<_>>()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, build, search);
criterion_main!(benches);
