//! Path Kernel benchmarks
//!
//! Run with `cargo bench --bench kernel_benchmark`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pathkernel::{GaussianKernel, Kernel, KernelMatrix, PathKernel, SymbolKernel, WeightTable};

/// Deterministic label sequence over `n_labels` symbols
fn label_sequence(len: usize, n_labels: usize, seed: usize) -> Vec<usize> {
    (0..len).map(|i| (i * 7 + seed * 3) % n_labels).collect()
}

/// Deterministic sequence of `dim`-dimensional vectors
fn vector_sequence(len: usize, dim: usize, seed: u64) -> Vec<Vec<f64>> {
    (0..len)
        .map(|i| {
            (0..dim)
                .map(|d| ((i * dim + d) as f64 * 0.1 + seed as f64).sin())
                .collect()
        })
        .collect()
}

fn bench_weight_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("weight_table");
    for dim in [16, 64, 256] {
        group.bench_with_input(BenchmarkId::new("direct", dim), &dim, |b, &dim| {
            b.iter(|| WeightTable::with_dimension(0.3, 0.4, black_box(dim)))
        });
    }
    group.finish();
}

fn bench_label_pair_value(c: &mut Criterion) {
    let symbols = SymbolKernel::identity(4).unwrap();
    let kernel = PathKernel::new(&symbols);

    let mut group = c.benchmark_group("path_pair_value_labels");
    for len in [8, 32, 128] {
        let s = label_sequence(len, 4, 1);
        let t = label_sequence(len, 4, 2);
        kernel.ensure_dimension(len);
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, _| {
            b.iter(|| {
                let k: f64 = kernel.pair_value(black_box(&s), black_box(&t)).unwrap();
                k
            })
        });
    }
    group.finish();
}

fn bench_vector_self_matrix(c: &mut Criterion) {
    let gaussian = GaussianKernel::new(1.0).unwrap();
    let kernel = PathKernel::new(&gaussian);
    let sequences: Vec<Vec<Vec<f64>>> = (0..16).map(|i| vector_sequence(24, 8, i)).collect();

    c.bench_function("path_self_matrix_16x24x8", |b| {
        b.iter(|| {
            let km: KernelMatrix = kernel.self_matrix(black_box(&sequences)).unwrap();
            km
        })
    });
}

criterion_group!(
    benches,
    bench_weight_table,
    bench_label_pair_value,
    bench_vector_self_matrix
);
criterion_main!(benches);
