//! ClusterMembership: the bidirectional gene/condition ↔ cluster index.
//!
//! Rows (genes) and columns (conditions) of a ratio matrix can belong to any
//! number of clusters at once. This index holds both directions of that
//! relation (name to clusters, cluster to names) and keeps them consistent
//! through every mutation, so the scoring engines can resolve a cluster's row
//! and column sets cheaply on every iteration.
//!
//! Inverse views are insertion-ordered: `rows_for_cluster` returns names in
//! the order their memberships were added, never sorted. The refinement loop
//! observes this order, so it is part of the contract.
//!
//! # Example
//!
//! ```rust
//! use biclust::ClusterMembership;
//!
//! let membership = ClusterMembership::new(
//!     vec![("R1".into(), vec![1, 3]), ("R2".into(), vec![2, 3])],
//!     vec![("C1".into(), vec![1, 2]), ("C2".into(), vec![2])],
//! );
//!
//! assert_eq!(membership.clusters_for_row("R1"), &[1, 3]);
//! assert_eq!(membership.rows_for_cluster(3), &["R1", "R2"]);
//! assert!(!membership.is_row_member_of("R1", 2));
//! ```

use crate::error::{BiclustError, Result};
use crate::matrix::DataMatrix;
use crate::seeding::{SeedColumnMemberships, SeedRowMemberships};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Bidirectional membership index between row/column names and cluster ids.
///
/// Cluster ids are positive; id 0 is the "unassigned" slot sentinel used by
/// seeding strategies and never enters the index. Forward lists carry no
/// duplicates.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterMembership {
    row_is_member_of: HashMap<String, Vec<usize>>,
    column_is_member_of: HashMap<String, Vec<usize>>,
    cluster_row_members: HashMap<usize, Vec<String>>,
    cluster_column_members: HashMap<usize, Vec<String>>,
}

impl ClusterMembership {
    /// Build an index from explicit ordered `(name, clusters)` pairs.
    ///
    /// Pair order defines the insertion order observable through
    /// [`rows_for_cluster`] / [`columns_for_cluster`]. Duplicate cluster ids
    /// within a list and the 0 sentinel are dropped.
    ///
    /// [`rows_for_cluster`]: Self::rows_for_cluster
    /// [`columns_for_cluster`]: Self::columns_for_cluster
    pub fn new(
        row_pairs: Vec<(String, Vec<usize>)>,
        column_pairs: Vec<(String, Vec<usize>)>,
    ) -> Self {
        let mut membership = Self::default();
        for (name, clusters) in row_pairs {
            for cluster in clusters {
                if cluster > 0 {
                    // Cannot fail: 0 is filtered above
                    let _ = membership.add_row_to_cluster(&name, cluster);
                }
            }
        }
        for (name, clusters) in column_pairs {
            for cluster in clusters {
                if cluster > 0 {
                    let _ = membership.add_column_to_cluster(&name, cluster);
                }
            }
        }
        membership
    }

    /// Seeded construction: allocate a zeroed `num_rows ×
    /// num_clusters_per_row` assignment, let the row strategy fill it in
    /// place, then let the column strategy derive and RETURN the column
    /// assignment. The convention asymmetry (rows write through the output
    /// parameter, columns return a value) is deliberate: column strategies
    /// read the completed row assignment as input.
    ///
    /// Slot value 0 means "unassigned" and is filtered out; each name's
    /// cluster list is sorted ascending when the raw assignment is converted
    /// into the index.
    ///
    /// Fails if `num_clusters < 1`, if either strategy fails, or if the
    /// column strategy returns an assignment for the wrong number of columns.
    pub fn create(
        matrix: &DataMatrix,
        num_clusters: usize,
        num_clusters_per_row: usize,
        num_clusters_per_column: usize,
        seed_rows: &mut dyn SeedRowMemberships,
        seed_columns: &mut dyn SeedColumnMemberships,
    ) -> Result<Self> {
        if num_clusters < 1 {
            return Err(BiclustError::InvalidClusterCount(num_clusters));
        }

        let mut row_membership = vec![vec![0usize; num_clusters_per_row]; matrix.num_rows()];
        seed_rows.seed(&mut row_membership, matrix)?;

        let column_membership =
            seed_columns.seed(matrix, &row_membership, num_clusters, num_clusters_per_column)?;
        if column_membership.len() != matrix.num_columns() {
            return Err(BiclustError::SeedingArity {
                expected: matrix.num_columns(),
                got: column_membership.len(),
            });
        }

        let row_pairs = member_pairs(&row_membership, matrix.row_names());
        let column_pairs = member_pairs(&column_membership, matrix.column_names());
        Ok(Self::new(row_pairs, column_pairs))
    }

    // --- Queries ---

    /// Clusters the named row belongs to; empty for unknown or unassigned
    /// names, never an error.
    pub fn clusters_for_row(&self, name: &str) -> &[usize] {
        self.row_is_member_of
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Clusters the named column belongs to; empty for unknown names.
    pub fn clusters_for_column(&self, name: &str) -> &[usize] {
        self.column_is_member_of
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Row names assigned to the cluster, in insertion order.
    pub fn rows_for_cluster(&self, cluster: usize) -> &[String] {
        self.cluster_row_members
            .get(&cluster)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Column names assigned to the cluster, in insertion order.
    pub fn columns_for_cluster(&self, cluster: usize) -> &[String] {
        self.cluster_column_members
            .get(&cluster)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_row_member_of(&self, name: &str, cluster: usize) -> bool {
        self.clusters_for_row(name).contains(&cluster)
    }

    pub fn is_column_member_of(&self, name: &str, cluster: usize) -> bool {
        self.clusters_for_column(name).contains(&cluster)
    }

    /// Number of rows assigned to the cluster.
    pub fn num_row_members(&self, cluster: usize) -> usize {
        self.rows_for_cluster(cluster).len()
    }

    /// Number of columns assigned to the cluster.
    pub fn num_column_members(&self, cluster: usize) -> usize {
        self.columns_for_cluster(cluster).len()
    }

    // --- Mutations ---

    /// Add the row to a cluster, updating forward and inverse views together.
    ///
    /// Adding an existing membership is a no-op; cluster id 0 is rejected.
    pub fn add_row_to_cluster(&mut self, name: &str, cluster: usize) -> Result<()> {
        if cluster == 0 {
            return Err(BiclustError::InvalidClusterId);
        }
        let clusters = self.row_is_member_of.entry(name.to_string()).or_default();
        if !clusters.contains(&cluster) {
            clusters.push(cluster);
            self.cluster_row_members
                .entry(cluster)
                .or_default()
                .push(name.to_string());
        }
        Ok(())
    }

    /// Add the column to a cluster. Same contract as [`add_row_to_cluster`].
    ///
    /// [`add_row_to_cluster`]: Self::add_row_to_cluster
    pub fn add_column_to_cluster(&mut self, name: &str, cluster: usize) -> Result<()> {
        if cluster == 0 {
            return Err(BiclustError::InvalidClusterId);
        }
        let clusters = self.column_is_member_of.entry(name.to_string()).or_default();
        if !clusters.contains(&cluster) {
            clusters.push(cluster);
            self.cluster_column_members
                .entry(cluster)
                .or_default()
                .push(name.to_string());
        }
        Ok(())
    }

    /// Remove the row from a cluster, updating both views. Returns `true` if
    /// the membership existed.
    pub fn remove_row_from_cluster(&mut self, name: &str, cluster: usize) -> bool {
        let removed = match self.row_is_member_of.get_mut(name) {
            Some(clusters) => match clusters.iter().position(|&c| c == cluster) {
                Some(pos) => {
                    clusters.remove(pos);
                    true
                }
                None => false,
            },
            None => false,
        };
        if removed {
            if let Some(rows) = self.cluster_row_members.get_mut(&cluster) {
                if let Some(pos) = rows.iter().position(|n| n == name) {
                    rows.remove(pos);
                }
            }
        }
        removed
    }

    /// Remove the column from a cluster. Returns `true` if it existed.
    pub fn remove_column_from_cluster(&mut self, name: &str, cluster: usize) -> bool {
        let removed = match self.column_is_member_of.get_mut(name) {
            Some(clusters) => match clusters.iter().position(|&c| c == cluster) {
                Some(pos) => {
                    clusters.remove(pos);
                    true
                }
                None => false,
            },
            None => false,
        };
        if removed {
            if let Some(columns) = self.cluster_column_members.get_mut(&cluster) {
                if let Some(pos) = columns.iter().position(|n| n == name) {
                    columns.remove(pos);
                }
            }
        }
        removed
    }
}

/// Convert a raw slot assignment into ordered `(name, clusters)` pairs:
/// unassigned slots (0) are dropped and each list is sorted ascending.
fn member_pairs(assignment: &[Vec<usize>], names: &[String]) -> Vec<(String, Vec<usize>)> {
    assignment
        .iter()
        .zip(names)
        .map(|(slots, name)| {
            let mut clusters: Vec<usize> = slots.iter().copied().filter(|&c| c > 0).collect();
            clusters.sort_unstable();
            (name.clone(), clusters)
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
