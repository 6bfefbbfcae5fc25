//! Seeding strategies: initial cluster assignments for rows and columns.
//!
//! A fresh [`ClusterMembership`] starts from two pluggable strategies injected
//! into [`ClusterMembership::create`]. The two call conventions differ on
//! purpose: row seeding writes cluster ids into a caller-allocated slot
//! structure, while column seeding runs second and returns a freshly built
//! assignment derived from the seeded rows.
//!
//! Slot value 0 means "unassigned"; strategies write 1-based cluster ids.
//!
//! # Example
//!
//! ```rust
//! use biclust::{DataMatrix, KMeansRowSeeder, SeedRowMemberships};
//!
//! let matrix = DataMatrix::from_rows(
//!     vec!["G1".into(), "G2".into(), "G3".into(), "G4".into()],
//!     vec!["C1".into(), "C2".into()],
//!     vec![
//!         vec![0.0, 0.0],
//!         vec![0.1, 0.0],
//!         vec![10.0, 10.0],
//!         vec![10.1, 10.0],
//!     ],
//! ).unwrap();
//!
//! let mut seeder = KMeansRowSeeder::with_seed(2, 42);
//! let mut assignment = vec![vec![0usize; 1]; 4];
//! seeder.seed(&mut assignment, &matrix).unwrap();
//! assert!(assignment.iter().all(|slots| (1..=2).contains(&slots[0])));
//! ```
//!
//! [`ClusterMembership`]: crate::membership::ClusterMembership
//! [`ClusterMembership::create`]: crate::membership::ClusterMembership::create

use crate::error::{BiclustError, Result};
use crate::matrix::DataMatrix;
use crate::scoring::compute_column_scores_submatrix;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::cmp::Ordering;

/// Row-seeding strategy: fill the caller-provided slot structure in place.
pub trait SeedRowMemberships {
    /// Populate `row_membership` (one slot vector per matrix row) with
    /// initial cluster ids. Produces no value; the output parameter is the
    /// contract.
    fn seed(&mut self, row_membership: &mut [Vec<usize>], matrix: &DataMatrix) -> Result<()>;
}

/// Column-seeding strategy: derive and return a column assignment from the
/// seeded row memberships.
pub trait SeedColumnMemberships {
    /// Return one slot vector per matrix column, each holding up to
    /// `num_clusters_per_column` cluster ids.
    fn seed(
        &mut self,
        matrix: &DataMatrix,
        row_membership: &[Vec<usize>],
        num_clusters: usize,
        num_clusters_per_column: usize,
    ) -> Result<Vec<Vec<usize>>>;
}

// =============================================================================
// KMeansRowSeeder
// =============================================================================

/// Row seeding via Lloyd's k-means over the matrix rows.
///
/// NaN values are treated as 0.0 for distance purposes. Each row's winning
/// cluster (1-based) lands in slot 0 of its assignment; remaining slots stay
/// unassigned for the refinement loop to fill.
///
/// Deterministic for a fixed RNG seed.
#[derive(Clone, Debug)]
pub struct KMeansRowSeeder {
    num_clusters: usize,
    max_iterations: usize,
    rng_seed: u64,
}

impl KMeansRowSeeder {
    /// Create with the default seed (0) and iteration cap (20).
    pub fn new(num_clusters: usize) -> Self {
        Self::with_seed(num_clusters, 0)
    }

    /// Create with a specific RNG seed for reproducible centroid choice.
    pub fn with_seed(num_clusters: usize, rng_seed: u64) -> Self {
        Self::with_params(num_clusters, 20, rng_seed)
    }

    /// Create with explicit parameters.
    pub fn with_params(num_clusters: usize, max_iterations: usize, rng_seed: u64) -> Self {
        Self {
            num_clusters,
            max_iterations,
            rng_seed,
        }
    }

    pub fn num_clusters(&self) -> usize {
        self.num_clusters
    }
}

impl SeedRowMemberships for KMeansRowSeeder {
    fn seed(&mut self, row_membership: &mut [Vec<usize>], matrix: &DataMatrix) -> Result<()> {
        let num_rows = matrix.num_rows();
        if self.num_clusters < 1 {
            return Err(BiclustError::InvalidClusterCount(self.num_clusters));
        }
        if self.num_clusters > num_rows {
            return Err(BiclustError::Seeding(format!(
                "requested {} clusters from a {}-row matrix",
                self.num_clusters, num_rows
            )));
        }
        if row_membership.len() != num_rows {
            return Err(BiclustError::Seeding(format!(
                "row assignment holds {} rows, matrix has {}",
                row_membership.len(),
                num_rows
            )));
        }

        let points: Vec<Vec<f64>> = (0..num_rows)
            .map(|r| {
                matrix
                    .row_values(r)
                    .iter()
                    .map(|v| if v.is_nan() { 0.0 } else { *v })
                    .collect()
            })
            .collect();

        // Initial centroids: distinct rows chosen by the seeded RNG
        let mut rng = ChaCha8Rng::seed_from_u64(self.rng_seed);
        let mut centroids: Vec<Vec<f64>> =
            rand::seq::index::sample(&mut rng, num_rows, self.num_clusters)
                .iter()
                .map(|r| points[r].clone())
                .collect();

        let mut assignment = vec![0usize; num_rows];
        for _ in 0..self.max_iterations {
            let mut changed = false;
            for (row, point) in points.iter().enumerate() {
                let best = nearest_centroid(point, &centroids);
                if assignment[row] != best {
                    assignment[row] = best;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
            for (c, centroid) in centroids.iter_mut().enumerate() {
                let members: Vec<&Vec<f64>> = points
                    .iter()
                    .zip(&assignment)
                    .filter(|(_, &a)| a == c)
                    .map(|(p, _)| p)
                    .collect();
                // A centroid that loses all rows keeps its position
                if members.is_empty() {
                    continue;
                }
                for (d, value) in centroid.iter_mut().enumerate() {
                    *value = members.iter().map(|p| p[d]).sum::<f64>() / members.len() as f64;
                }
            }
        }

        for (row, slots) in row_membership.iter_mut().enumerate() {
            if let Some(first) = slots.first_mut() {
                *first = assignment[row] + 1;
            }
        }
        Ok(())
    }
}

/// Index of the closest centroid by squared Euclidean distance; first minimum
/// wins ties.
fn nearest_centroid(point: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (c, centroid) in centroids.iter().enumerate() {
        let dist: f64 = point
            .iter()
            .zip(centroid.iter())
            .map(|(p, q)| (p - q) * (p - q))
            .sum();
        if dist < best_dist {
            best_dist = dist;
            best = c;
        }
    }
    best
}

// =============================================================================
// BestColumnSeeder
// =============================================================================

/// Column seeding by per-cluster column-score ranking.
///
/// For each cluster, the rows whose slot-0 assignment names it form a
/// submatrix over all columns; that submatrix's negated column scores say how
/// coherent the cluster is at each column (lower raw score = tighter = more
/// preferred). Each column is then assigned its `num_clusters_per_column`
/// best-ranked clusters via [`order`].
#[derive(Clone, Copy, Debug, Default)]
pub struct BestColumnSeeder;

impl BestColumnSeeder {
    pub fn new() -> Self {
        Self
    }
}

impl SeedColumnMemberships for BestColumnSeeder {
    fn seed(
        &mut self,
        matrix: &DataMatrix,
        row_membership: &[Vec<usize>],
        num_clusters: usize,
        num_clusters_per_column: usize,
    ) -> Result<Vec<Vec<usize>>> {
        if num_clusters < 1 {
            return Err(BiclustError::InvalidClusterCount(num_clusters));
        }
        if row_membership.len() != matrix.num_rows() {
            return Err(BiclustError::Seeding(format!(
                "row assignment holds {} rows, matrix has {}",
                row_membership.len(),
                matrix.num_rows()
            )));
        }

        // Negated column scores per cluster, over the cluster's seeded rows
        let mut neg_scores: Vec<Vec<f64>> = Vec::with_capacity(num_clusters);
        for cluster in 1..=num_clusters {
            let member_rows: Vec<String> = row_membership
                .iter()
                .enumerate()
                .filter(|(_, slots)| slots.first() == Some(&cluster))
                .map(|(row, _)| matrix.row_names()[row].clone())
                .collect();
            let submatrix = matrix.submatrix_by_name(Some(&member_rows), None);
            let scores = compute_column_scores_submatrix(&submatrix);
            neg_scores.push(scores.row_values(0).iter().map(|s| -s).collect());
        }

        let take = num_clusters_per_column.min(num_clusters);
        let mut result = Vec::with_capacity(matrix.num_columns());
        for column in 0..matrix.num_columns() {
            let column_scores: Vec<f64> =
                neg_scores.iter().map(|scores| scores[column]).collect();
            let ranked = order(&column_scores);
            result.push(ranked[..take].to_vec());
        }
        Ok(result)
    }
}

/// R-style `order`: 1-based positions of the values sorted descending.
///
/// Ties resolve to the FIRST matching position, so duplicated values yield
/// duplicated indices; callers rely on that. NaN sorts last (least
/// preferred).
pub fn order(values: &[f64]) -> Vec<usize> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(a).unwrap_or(Ordering::Equal),
    });
    sorted
        .iter()
        .map(|v| {
            // sorted is a permutation of values, so the scan always finds one
            values
                .iter()
                .position(|x| x == v || (x.is_nan() && v.is_nan()))
                .unwrap()
                + 1
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_ranks_descending_one_based() {
        assert_eq!(order(&[1.0, 3.0, 2.0]), vec![2, 3, 1]);
    }

    #[test]
    fn test_order_ties_repeat_first_index() {
        // Both 5.0 entries resolve to the first occurrence, repeating index 1.
        assert_eq!(order(&[5.0, 7.0, 5.0]), vec![2, 1, 1]);
    }

    #[test]
    fn test_order_nan_ranks_last() {
        assert_eq!(order(&[1.0, f64::NAN, 2.0]), vec![3, 1, 2]);
    }

    #[test]
    fn test_best_column_seeder_hand_computed() {
        let matrix = DataMatrix::from_rows(
            vec!["GENE1".to_string(), "GENE2".to_string(), "GENE3".to_string()],
            vec!["COL1".to_string(), "COL2".to_string()],
            vec![vec![1.0, 2.0], vec![2.0, 1.0], vec![2.0, 1.0]],
        )
        .expect("matrix construction failed");
        let row_membership = vec![vec![1, 0], vec![2, 0], vec![1, 0]];

        let mut seeder = BestColumnSeeder::new();
        let assignment = seeder
            .seed(&matrix, &row_membership, 2, 2)
            .expect("seeding failed");

        assert_eq!(assignment.len(), 2);
        assert_eq!(assignment[0], vec![2, 1]);
        assert_eq!(assignment[1], vec![2, 1]);
    }

    #[test]
    fn test_best_column_seeder_caps_at_num_clusters() {
        let matrix = DataMatrix::from_rows(
            vec!["G1".to_string(), "G2".to_string()],
            vec!["C1".to_string()],
            vec![vec![1.0], vec![2.0]],
        )
        .expect("matrix construction failed");
        let row_membership = vec![vec![1], vec![1]];

        let mut seeder = BestColumnSeeder::new();
        let assignment = seeder
            .seed(&matrix, &row_membership, 1, 5)
            .expect("seeding failed");
        assert_eq!(assignment[0], vec![1], "Cannot assign more clusters than exist");
    }

    #[test]
    fn test_kmeans_rejects_more_clusters_than_rows() {
        let matrix = DataMatrix::from_rows(
            vec!["G1".to_string(), "G2".to_string()],
            vec!["C1".to_string()],
            vec![vec![1.0], vec![2.0]],
        )
        .expect("matrix construction failed");
        let mut seeder = KMeansRowSeeder::new(5);
        let mut assignment = vec![vec![0usize; 1]; 2];
        assert!(matches!(
            seeder.seed(&mut assignment, &matrix),
            Err(BiclustError::Seeding(_))
        ));
    }

    #[test]
    fn test_kmeans_separates_clear_blobs() {
        let matrix = DataMatrix::from_rows(
            vec![
                "G1".to_string(),
                "G2".to_string(),
                "G3".to_string(),
                "G4".to_string(),
            ],
            vec!["C1".to_string(), "C2".to_string()],
            vec![
                vec![0.0, 0.0],
                vec![0.1, 0.0],
                vec![10.0, 10.0],
                vec![10.1, 10.0],
            ],
        )
        .expect("matrix construction failed");

        let mut seeder = KMeansRowSeeder::with_seed(2, 7);
        let mut assignment = vec![vec![0usize; 2]; 4];
        seeder.seed(&mut assignment, &matrix).expect("seeding failed");

        assert_eq!(assignment[0][0], assignment[1][0], "Near rows share a cluster");
        assert_eq!(assignment[2][0], assignment[3][0], "Near rows share a cluster");
        assert_ne!(
            assignment[0][0], assignment[2][0],
            "Distant rows get different clusters"
        );
        for slots in &assignment {
            assert!((1..=2).contains(&slots[0]), "Cluster id out of range");
            assert_eq!(slots[1], 0, "Only slot 0 is seeded");
        }
    }

    #[test]
    fn test_kmeans_deterministic_for_fixed_seed() {
        let matrix = DataMatrix::from_rows(
            (0..6).map(|i| format!("G{}", i)).collect(),
            vec!["C1".to_string(), "C2".to_string(), "C3".to_string()],
            vec![
                vec![1.0, 0.0, 0.5],
                vec![0.9, 0.1, 0.4],
                vec![5.0, 5.0, 5.0],
                vec![5.1, 4.9, 5.2],
                vec![-3.0, -3.0, 0.0],
                vec![-3.1, -2.9, 0.1],
            ],
        )
        .expect("matrix construction failed");

        let run = |seed: u64| {
            let mut seeder = KMeansRowSeeder::with_seed(3, seed);
            let mut assignment = vec![vec![0usize; 1]; 6];
            seeder.seed(&mut assignment, &matrix).expect("seeding failed");
            assignment
        };

        assert_eq!(run(42), run(42), "Same seed must reproduce the assignment");
    }

    #[test]
    fn test_kmeans_handles_nan_values() {
        let matrix = DataMatrix::from_rows(
            vec!["G1".to_string(), "G2".to_string(), "G3".to_string()],
            vec!["C1".to_string(), "C2".to_string()],
            vec![
                vec![f64::NAN, 0.0],
                vec![0.2, f64::NAN],
                vec![9.0, 9.0],
            ],
        )
        .expect("matrix construction failed");

        let mut seeder = KMeansRowSeeder::with_seed(2, 1);
        let mut assignment = vec![vec![0usize; 1]; 3];
        seeder.seed(&mut assignment, &matrix).expect("seeding failed");
        for slots in &assignment {
            assert!((1..=2).contains(&slots[0]), "NaN rows still get assigned");
        }
    }
}
