//! # biclust: Iterative Biclustering for Expression Data
//!
//! biclust implements the membership and scoring core of a cMonkey-style
//! biclustering pipeline. Genes and conditions are grouped into overlapping
//! clusters, and per-cluster fit scores computed over the expression matrix
//! drive iterative refinement of those groups.
//!
//! ## Quick Start
//!
//! ```rust
//! use biclust::{
//!     compute_column_scores, compute_row_scores, BestColumnSeeder, ClusterMembership,
//!     DataMatrix, KMeansRowSeeder,
//! };
//!
//! // Expression ratios: genes × conditions.
//! let matrix = DataMatrix::from_rows(
//!     vec!["G1".into(), "G2".into(), "G3".into(), "G4".into()],
//!     vec!["C1".into(), "C2".into(), "C3".into()],
//!     vec![
//!         vec![0.1, 2.0, -1.3],
//!         vec![0.2, 2.1, -1.2],
//!         vec![-0.9, -0.4, 1.1],
//!         vec![-1.0, -0.5, 1.2],
//!     ],
//! ).unwrap();
//!
//! // Seed two clusters and index the assignments both ways.
//! let mut row_seeder = KMeansRowSeeder::with_seed(2, 17);
//! let mut column_seeder = BestColumnSeeder::new();
//! let membership =
//!     ClusterMembership::create(&matrix, 2, 1, 2, &mut row_seeder, &mut column_seeder).unwrap();
//!
//! // Score every gene and every condition against every cluster.
//! let row_scores = compute_row_scores(&membership, &matrix, 2);
//! let column_scores = compute_column_scores(&membership, &matrix, 2);
//! assert_eq!(row_scores.num_rows(), 4);
//! assert_eq!(column_scores.num_rows(), 3);
//! ```
//!
//! ## Core Concepts
//!
//! - **Ratio matrix**: dense named genes × conditions expression values
//! - **Membership**: bidirectional index between names and cluster ids;
//!   a gene or condition may sit in several clusters at once
//! - **Seeding**: pluggable strategies produce the initial assignment
//! - **Scoring**: per-cluster row/column fit scores (lower = better fit)
//!   computed fresh from the current membership each iteration

pub mod dfile;
pub mod error;
pub mod matrix;
pub mod membership;
pub mod organism;
pub mod preprocess;
pub mod scoring;
pub mod seeding;
pub mod stats;

// Re-exports for convenience
pub use dfile::{DelimitedFile, ReadOptions};
pub use error::{BiclustError, Result};
pub use matrix::DataMatrix;
pub use membership::ClusterMembership;
pub use organism::{Human, SequenceDistances, SequenceType};
pub use scoring::{compute_column_scores, compute_column_scores_submatrix, compute_row_scores};
pub use seeding::{BestColumnSeeder, KMeansRowSeeder, SeedColumnMemberships, SeedRowMemberships};

#[cfg(test)]
mod tests {
    use super::*;

    /// Six genes split across two clean expression programs.
    fn blob_matrix() -> DataMatrix {
        DataMatrix::from_rows(
            (1..=6).map(|i| format!("GENE{}", i)).collect(),
            (1..=4).map(|i| format!("COND{}", i)).collect(),
            vec![
                vec![2.0, 1.9, -1.0, -1.1],
                vec![2.1, 2.0, -0.9, -1.0],
                vec![1.9, 2.1, -1.1, -0.9],
                vec![-1.0, -0.9, 2.0, 2.1],
                vec![-1.1, -1.0, 2.1, 1.9],
                vec![-0.9, -1.1, 1.9, 2.0],
            ],
        )
        .expect("matrix construction failed")
    }

    #[test]
    fn test_seeded_pipeline_end_to_end() {
        let matrix = blob_matrix();
        // Single-start Lloyd's does not split the programs for every seed;
        // this seed converges to the clean 3-3 split the assertions pin.
        let mut row_seeder = KMeansRowSeeder::with_seed(2, 2);
        let mut column_seeder = BestColumnSeeder::new();
        let membership =
            ClusterMembership::create(&matrix, 2, 1, 2, &mut row_seeder, &mut column_seeder)
                .expect("seeded membership");

        // The two programs separate: GENE1-3 share a cluster, GENE4-6 the other.
        for gene in matrix.row_names() {
            assert_eq!(membership.clusters_for_row(gene).len(), 1);
        }
        let first = membership.clusters_for_row("GENE1")[0];
        let second = membership.clusters_for_row("GENE4")[0];
        assert_ne!(first, second);
        for gene in ["GENE2", "GENE3"] {
            assert_eq!(membership.clusters_for_row(gene), &[first]);
        }
        for gene in ["GENE5", "GENE6"] {
            assert_eq!(membership.clusters_for_row(gene), &[second]);
        }

        let row_scores = compute_row_scores(&membership, &matrix, 2);
        assert_eq!(row_scores.row_names(), matrix.row_names());
        assert_eq!(row_scores.column_names(), &["1", "2"]);

        // A gene fits its own cluster better (lower score) than the other.
        let own = row_scores[(0, first - 1)];
        let other = row_scores[(0, second - 1)];
        assert!(
            own < other,
            "GENE1 should fit its own cluster: {} vs {}",
            own,
            other
        );

        let column_scores = compute_column_scores(&membership, &matrix, 2);
        assert_eq!(column_scores.row_names(), matrix.column_names());
        assert_eq!(column_scores.num_columns(), 2);
    }

    #[test]
    fn test_seeded_membership_well_formed_for_any_partition() {
        // Some seeds leave k-means in a mixed partition instead of the clean
        // program split. The membership structure must hold either way: one
        // cluster per row, no cluster left empty, and every condition
        // assigned to both clusters (num_clusters_per_column = num_clusters).
        let matrix = blob_matrix();
        for seed in [0, 2, 11] {
            let mut row_seeder = KMeansRowSeeder::with_seed(2, seed);
            let mut column_seeder = BestColumnSeeder::new();
            let membership =
                ClusterMembership::create(&matrix, 2, 1, 2, &mut row_seeder, &mut column_seeder)
                    .expect("seeded membership");

            for gene in matrix.row_names() {
                assert_eq!(
                    membership.clusters_for_row(gene).len(),
                    1,
                    "seed {}: {} should sit in exactly one cluster",
                    seed,
                    gene
                );
            }
            for cluster in 1..=2 {
                assert!(
                    !membership.rows_for_cluster(cluster).is_empty(),
                    "seed {}: cluster {} should keep at least one row",
                    seed,
                    cluster
                );
            }
            for condition in matrix.column_names() {
                assert_eq!(
                    membership.clusters_for_column(condition),
                    &[1, 2],
                    "seed {}: {} should belong to both clusters",
                    seed,
                    condition
                );
            }
        }
    }

    #[test]
    fn test_same_seed_reproduces_membership() {
        let matrix = blob_matrix();
        let run = || {
            let mut row_seeder = KMeansRowSeeder::with_seed(2, 42);
            let mut column_seeder = BestColumnSeeder::new();
            ClusterMembership::create(&matrix, 2, 1, 2, &mut row_seeder, &mut column_seeder)
                .expect("seeded membership")
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_membership_serde_round_trip() {
        let membership = ClusterMembership::new(
            vec![
                ("GENE1".to_string(), vec![1, 3]),
                ("GENE2".to_string(), vec![3]),
            ],
            vec![("COND1".to_string(), vec![1])],
        );
        let json = serde_json::to_string(&membership).expect("serialize");
        let back: ClusterMembership = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(membership, back);
    }

    #[test]
    fn test_matrix_serde_round_trip() {
        let matrix = blob_matrix();
        let json = serde_json::to_string(&matrix).expect("serialize");
        let back: DataMatrix = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(matrix, back);
    }
}
