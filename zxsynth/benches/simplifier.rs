use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use zxsynth::circuit::Circuit;
use zxsynth::extract::ToCircuit;
use zxsynth::simplify::{clifford_simp, full_reduce, interior_clifford_simp};
use zxsynth::vec_graph::*;

fn random_graph(qubits: usize, depth: usize) -> Graph {
    Circuit::random()
        .seed(1337)
        .qubits(qubits)
        .depth(depth)
        .clifford_t(0.1)
        .build()
        .to_graph()
        .unwrap()
}

fn simp_random_circuit(c: &mut Criterion) {
    // initial setup
    let g = random_graph(20, 1000);

    // benchmarking code
    let mut group = c.benchmark_group("random_circuit");
    group.sample_size(10); // 10 is the minimum, 100 is default

    group.bench_function("interior_clifford_simp", |b| {
        b.iter_batched_ref(
            || g.clone(), // clone the graph before timing
            |g1| interior_clifford_simp(g1).unwrap(),
            BatchSize::LargeInput,
        )
    });

    group.bench_function("clifford_simp", |b| {
        b.iter_batched_ref(
            || g.clone(),
            |g1| clifford_simp(g1).unwrap(),
            BatchSize::LargeInput,
        )
    });

    group.bench_function("full_reduce", |b| {
        b.iter_batched_ref(
            || g.clone(),
            |g1| full_reduce(g1).unwrap(),
            BatchSize::LargeInput,
        )
    });

    group.finish();
}

fn extract_random_circuit(c: &mut Criterion) {
    let mut g = random_graph(10, 400);
    full_reduce(&mut g).unwrap();

    let mut group = c.benchmark_group("extract");
    group.sample_size(10);

    // extraction consumes the graph, so each run works on a fresh copy
    group.bench_function("extract_full_reduced", |b| {
        b.iter_batched_ref(
            || g.clone(),
            |g1| g1.into_circuit().unwrap(),
            BatchSize::LargeInput,
        )
    });

    group.finish();
}

criterion_group!(benches, simp_random_circuit, extract_random_circuit);
criterion_main!(benches);
