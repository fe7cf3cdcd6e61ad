use chain_dp::{ChainPlanner, DimensionSequence};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use sysinfo::{get_current_pid, ProcessRefreshKind, System};

fn random_dims(rng: &mut StdRng, n: usize) -> DimensionSequence {
    let values: Vec<i64> = (0..=n).map(|_| rng.gen_range(1..=100)).collect();
    DimensionSequence::from_values(values).unwrap()
}

fn rss_kib() -> u64 {
    let mut sys = System::new();
    sys.refresh_processes_specifics(ProcessRefreshKind::new().with_memory());
    match get_current_pid().ok().and_then(|pid| sys.process(pid)) {
        Some(p) => p.memory() / 1024,
        None => 0,
    }
}

fn bench_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan");
    for &n in &[32usize, 128, 256] {
        group.bench_function(format!("plan_n_{n}"), |b| {
            b.iter_batched(
                || {
                    let mut rng = StdRng::seed_from_u64(42);
                    random_dims(&mut rng, n)
                },
                |dims| {
                    let before = rss_kib();
                    let plan = ChainPlanner::new().plan_dims(&dims);
                    let after = rss_kib();
                    criterion::black_box(plan.min_cost());
                    // record memory delta to stderr to avoid criterion noise
                    eprintln!("RSS KiB delta (plan {n}): {}", after.saturating_sub(before));
                },
                BatchSize::PerIteration,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_plan);
criterion_main!(benches);
