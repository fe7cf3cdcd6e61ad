use chain_dp::{enumerate_steps, ChainPlanner, DimensionSequence};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_dims(n: usize) -> DimensionSequence {
    let mut rng = StdRng::seed_from_u64(7);
    let values: Vec<i64> = (0..=n).map(|_| rng.gen_range(1..=100)).collect();
    DimensionSequence::from_values(values).unwrap()
}

fn bench_steps(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill_trace");
    for &n in &[16usize, 64, 128] {
        let dims = random_dims(n);
        group.bench_function(format!("enumerate_steps_n_{n}"), |b| {
            b.iter(|| {
                let candidates: usize = enumerate_steps(&dims).map(|s| s.candidates.len()).sum();
                black_box(candidates)
            })
        });
        group.bench_function(format!("plan_traced_n_{n}"), |b| {
            let planner = ChainPlanner::new();
            b.iter(|| black_box(planner.plan_traced(&dims)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_steps);
criterion_main!(benches);
