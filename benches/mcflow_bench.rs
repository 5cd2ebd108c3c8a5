//! Criterion benchmarks for instance generation and both solve paths.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;
use u_mcflow::adapter::{CpFlowSolver, FlowSolver, IpFlowSolver};
use u_mcflow::formulation::FlowModel;
use u_mcflow::network::{InstanceConfig, ProblemInstance};

const TIMEOUT: Duration = Duration::from_secs(30);

fn model(n: usize, m: usize, k: usize) -> FlowModel {
    let instance = ProblemInstance::generate(&InstanceConfig::new(n, m, k))
        .unwrap_or_else(|e| panic!("bench instance: {e}"));
    FlowModel::formulate(&instance)
}

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    for &(n, m, k) in &[(8, 16, 2), (15, 40, 4), (50, 300, 8)] {
        let config = InstanceConfig::new(n, m, k);
        group.bench_with_input(
            BenchmarkId::new(format!("n{}_m{}_k{}", n, m, k), n),
            &config,
            |b, config| {
                b.iter(|| ProblemInstance::generate(black_box(config)));
            },
        );
    }
    group.finish();
}

fn bench_ip(c: &mut Criterion) {
    let mut group = c.benchmark_group("ip_solve");
    group.sample_size(10);

    for &(n, m, k) in &[(6, 10, 1), (8, 16, 2)] {
        let model = model(n, m, k);
        let solver = IpFlowSolver::new();
        group.bench_with_input(BenchmarkId::from_parameter(n), &model, |b, model| {
            b.iter(|| solver.solve(black_box(model), TIMEOUT));
        });
    }
    group.finish();
}

fn bench_cp(c: &mut Criterion) {
    let mut group = c.benchmark_group("cp_solve");
    group.sample_size(10);

    for &(n, m, k) in &[(4, 6, 1), (6, 10, 1)] {
        let model = model(n, m, k);
        let solver = CpFlowSolver::new();
        group.bench_with_input(BenchmarkId::from_parameter(n), &model, |b, model| {
            b.iter(|| solver.solve(black_box(model), TIMEOUT));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_generate, bench_ip, bench_cp);
criterion_main!(benches);
