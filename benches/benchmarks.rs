//! Benchmarks for biclust scoring and seeding.

use biclust::{
    compute_column_scores, compute_column_scores_submatrix, compute_row_scores, BestColumnSeeder,
    ClusterMembership, DataMatrix, KMeansRowSeeder,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Dense random ratio matrix with reproducible values.
fn synthetic_matrix(num_rows: usize, num_columns: usize, seed: u64) -> DataMatrix {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let rows: Vec<Vec<f64>> = (0..num_rows)
        .map(|_| (0..num_columns).map(|_| rng.gen_range(-2.0..2.0)).collect())
        .collect();
    DataMatrix::from_rows(
        (0..num_rows).map(|i| format!("GENE{}", i)).collect(),
        (0..num_columns).map(|j| format!("COND{}", j)).collect(),
        rows,
    )
    .expect("matrix construction failed")
}

fn seeded_membership(matrix: &DataMatrix, num_clusters: usize) -> ClusterMembership {
    let mut row_seeder = KMeansRowSeeder::with_seed(num_clusters, 7);
    let mut column_seeder = BestColumnSeeder::new();
    ClusterMembership::create(matrix, num_clusters, 2, 5, &mut row_seeder, &mut column_seeder)
        .expect("seeded membership")
}

fn benchmark_column_scores_submatrix(c: &mut Criterion) {
    let matrix = synthetic_matrix(200, 20, 1);

    c.bench_function("column_scores_submatrix_200x20", |b| {
        b.iter(|| compute_column_scores_submatrix(black_box(&matrix)))
    });
}

fn benchmark_row_scoring(c: &mut Criterion) {
    let matrix = synthetic_matrix(200, 20, 2);
    let membership = seeded_membership(&matrix, 10);

    c.bench_function("compute_row_scores_200x20_k10", |b| {
        b.iter(|| compute_row_scores(black_box(&membership), black_box(&matrix), 10))
    });
}

fn benchmark_column_scoring(c: &mut Criterion) {
    let matrix = synthetic_matrix(200, 20, 2);
    let membership = seeded_membership(&matrix, 10);

    c.bench_function("compute_column_scores_200x20_k10", |b| {
        b.iter(|| compute_column_scores(black_box(&membership), black_box(&matrix), 10))
    });
}

fn benchmark_membership_creation(c: &mut Criterion) {
    let matrix = synthetic_matrix(200, 20, 3);

    c.bench_function("membership_create_200x20_k10", |b| {
        b.iter(|| {
            let mut row_seeder = KMeansRowSeeder::with_seed(10, 7);
            let mut column_seeder = BestColumnSeeder::new();
            ClusterMembership::create(
                black_box(&matrix),
                10,
                2,
                5,
                &mut row_seeder,
                &mut column_seeder,
            )
            .expect("seeded membership")
        })
    });
}

fn benchmark_row_scoring_scale(c: &mut Criterion) {
    let mut group = c.benchmark_group("row_scoring_scale");

    for (num_rows, num_columns) in [(100, 10), (200, 20), (400, 40)] {
        let matrix = synthetic_matrix(num_rows, num_columns, 4);
        let membership = seeded_membership(&matrix, 10);

        group.bench_function(format!("{}x{}", num_rows, num_columns), |b| {
            b.iter(|| compute_row_scores(black_box(&membership), black_box(&matrix), 10))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_column_scores_submatrix,
    benchmark_row_scoring,
    benchmark_column_scoring,
    benchmark_membership_creation,
    benchmark_row_scoring_scale,
);

criterion_main!(benches);
