//! Performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use perseg::{AddSum, PersistentSegTree, SumCell};

fn sample_tree(n: usize) -> PersistentSegTree<AddSum> {
    let values: Vec<SumCell> = (0..n as i64).map(SumCell::new).collect();
    PersistentSegTree::build(&values)
}

fn benchmark_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for n in [1 << 10, 1 << 16] {
        let values: Vec<SumCell> = (0..n as i64).map(SumCell::new).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter(|| PersistentSegTree::<AddSum>::build(black_box(values)));
        });
    }
    group.finish();
}

fn benchmark_updates(c: &mut Criterion) {
    // Fresh tree per batch so the shared pool does not grow without bound
    let n = 1 << 12;

    c.bench_function("set_n=4096", |b| {
        let mut k = 0;
        b.iter_batched(
            || sample_tree(n),
            |tree| {
                k = (k + 7919) % n;
                tree.set(k, SumCell::new(1))
            },
            BatchSize::SmallInput,
        );
    });

    c.bench_function("apply_n=4096", |b| {
        let mut k = 0;
        b.iter_batched(
            || sample_tree(n),
            |tree| {
                k = (k + 7919) % (n / 2);
                tree.apply(k..k + n / 2, 3)
            },
            BatchSize::SmallInput,
        );
    });
}

fn benchmark_fold(c: &mut Criterion) {
    let n = 1 << 16;
    let tree = sample_tree(n).apply(100..60_000, 5);

    c.bench_function("fold_n=65536", |b| {
        let mut k = 0;
        b.iter(|| {
            k = (k + 7919) % (n / 2);
            black_box(tree.fold(k..k + n / 3));
        });
    });
}

criterion_group!(benches, benchmark_build, benchmark_updates, benchmark_fold);
criterion_main!(benches);
