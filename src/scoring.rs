//! Row and column scoring engines.
//!
//! Both engines read a [`ClusterMembership`] and a ratio matrix and hand back
//! a fresh Score Matrix: one row per gene (or condition), one column per
//! cluster id `1..=num_clusters`. The driver reads scores, updates
//! membership, and asks again; scoring itself never mutates anything.
//!
//! # Scores
//!
//! **Column score** of column `j` over a submatrix: population variance of
//! the column divided by `|column mean| + 0.01`. Low variance relative to the
//! mean = coherent column = low score; the dampening constant keeps
//! near-zero-mean columns from exploding.
//!
//! **Row score** of row `i` for cluster `c`: `ln` of the mean squared
//! deviation of the row's values from the cluster profile (column means of
//! the member-row × member-column submatrix), taken over the cluster's
//! column set. Every matrix row is scored against every cluster, member or
//! not, so the driver can move rows toward clusters they fit better.
//!
//! Non-finite scores are intentional: an empty cluster yields NaN (no
//! profile), a perfectly fitting row yields `-inf` (log of zero deviation).
//! Consumers treat them as "undefined preference".
//!
//! # Example
//!
//! ```rust
//! use biclust::{compute_column_scores_submatrix, DataMatrix};
//!
//! let matrix = DataMatrix::from_rows(
//!     vec!["G1".into(), "G2".into()],
//!     vec!["C1".into(), "C2".into()],
//!     vec![vec![1.0, 2.0], vec![2.0, 1.0]],
//! ).unwrap();
//!
//! let scores = compute_column_scores_submatrix(&matrix);
//! assert_eq!(scores.num_rows(), 1);
//! assert!((scores[(0, 0)] - 0.25 / 1.51).abs() < 1e-12);
//! ```
//!
//! [`ClusterMembership`]: crate::membership::ClusterMembership

use crate::matrix::DataMatrix;
use crate::membership::ClusterMembership;
use crate::stats::population_variance;
use std::time::Instant;
use tracing::debug;

/// Column scores for an already-extracted submatrix: one score per column,
/// as a 1 × num_columns Score Matrix.
///
/// `score_j = population_variance(column_j) / (|mean(column_j)| + 0.01)`.
/// A submatrix with zero rows yields NaN for every column.
pub fn compute_column_scores_submatrix(matrix: &DataMatrix) -> DataMatrix {
    let colmeans = matrix.column_means();
    let scores: Vec<f64> = colmeans
        .iter()
        .enumerate()
        .map(|(c, colmean)| {
            let column = matrix.column_values(c);
            let var_norm = colmean.abs() + 0.01;
            population_variance(&column) / var_norm
        })
        .collect();
    DataMatrix::new_unchecked(
        vec!["scores".to_string()],
        matrix.column_names().to_vec(),
        scores,
    )
}

/// Column scores for every cluster: (num_columns × num_clusters).
///
/// Per cluster, the member rows are resolved through the membership index and
/// scored over ALL columns by [`compute_column_scores_submatrix`]; column `c`
/// of the result holds cluster `c+1`'s scores. Clusters with no member rows
/// produce NaN columns.
pub fn compute_column_scores(
    membership: &ClusterMembership,
    matrix: &DataMatrix,
    num_clusters: usize,
) -> DataMatrix {
    let start = Instant::now();
    let mut result = score_matrix(matrix.column_names().to_vec(), num_clusters);
    for cluster in 1..=num_clusters {
        let member_rows = membership.rows_for_cluster(cluster);
        let submatrix = matrix.submatrix_by_name(Some(member_rows), None);
        let scores = compute_column_scores_submatrix(&submatrix);
        for column in 0..matrix.num_columns() {
            result[(column, cluster - 1)] = scores[(0, column)];
        }
    }
    debug!(
        num_clusters,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "computed column scores"
    );
    result
}

/// Row scores for every cluster: (num_rows × num_clusters).
///
/// Per cluster, the profile is the column-mean vector of the member-row ×
/// member-column submatrix; each matrix row is then scored as
/// `ln(mean((row - profile)²))` over the cluster's column set. Rows belonging
/// to no cluster still get a full score row; the Score Matrix always aligns
/// 1:1 with the ratio matrix's row order.
pub fn compute_row_scores(
    membership: &ClusterMembership,
    matrix: &DataMatrix,
    num_clusters: usize,
) -> DataMatrix {
    let start = Instant::now();
    let mut result = score_matrix(matrix.row_names().to_vec(), num_clusters);
    for cluster in 1..=num_clusters {
        let member_rows = membership.rows_for_cluster(cluster);
        let member_columns = membership.columns_for_cluster(cluster);
        let profile = matrix
            .submatrix_by_name(Some(member_rows), Some(member_columns))
            .column_means();
        let reduced = matrix.submatrix_by_name(None, Some(member_columns));
        for row in 0..reduced.num_rows() {
            let values = reduced.row_values(row);
            let mean_sq_dev = values
                .iter()
                .zip(profile.iter())
                .map(|(v, m)| (v - m) * (v - m))
                .sum::<f64>()
                / values.len() as f64;
            result[(row, cluster - 1)] = mean_sq_dev.ln();
        }
    }
    debug!(
        num_clusters,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "computed row scores"
    );
    result
}

/// Fresh zero-filled Score Matrix: given names × cluster ids rendered as
/// strings `"1"..="num_clusters"`.
fn score_matrix(names: Vec<String>, num_clusters: usize) -> DataMatrix {
    let cluster_names: Vec<String> = (1..=num_clusters).map(|c| c.to_string()).collect();
    let values = vec![0.0; names.len() * num_clusters];
    DataMatrix::new_unchecked(names, cluster_names, values)
}

// =============================================================================
// Tests
// =============================================================================
