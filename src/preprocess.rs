//! Microarray preprocessing: probe selection and intensity-to-ratio conversion.
//!
//! Expression sets arrive as raw per-probe intensities over several condition
//! groups (for example diseased vs healthy tissue), usually with designated
//! control columns per group. Before clustering, the pipeline selects the
//! most variable probes and converts intensities into centered, scaled ratios
//! against the group controls.
//!
//! Group arguments are ordered `(name, ...)` pairs; allocation and iteration
//! follow that order, and the last group always absorbs the rounding
//! remainder so budgets sum exactly.
//!
//! # Example
//!
//! ```rust
//! use biclust::preprocess::genes_per_group_proportional;
//!
//! let allocation = genes_per_group_proportional(
//!     100,
//!     &[("diseased".to_string(), 3), ("healthy".to_string(), 1)],
//! );
//! assert_eq!(
//!     allocation,
//!     vec![("diseased".to_string(), 75), ("healthy".to_string(), 25)]
//! );
//! ```

use crate::matrix::DataMatrix;
use crate::seeding::order;
use crate::stats::{coefficient_of_variation, mean, median, sample_stddev};

/// Distributes a total gene budget across ordered groups proportionally to
/// their sizes. All groups but the last truncate; the last receives whatever
/// remains, so the returned counts sum to `num_genes_total`.
pub fn genes_per_group_proportional(
    num_genes_total: usize,
    group_sizes: &[(String, usize)],
) -> Vec<(String, usize)> {
    let total_elems: usize = group_sizes.iter().map(|(_, size)| size).sum();
    let mut result = Vec::with_capacity(group_sizes.len());
    let mut allocated = 0;
    for (index, (name, size)) in group_sizes.iter().enumerate() {
        let count = if index == group_sizes.len() - 1 {
            num_genes_total - allocated
        } else {
            (num_genes_total as f64 * *size as f64 / total_elems as f64) as usize
        };
        allocated += count;
        result.push((name.clone(), count));
    }
    result
}

/// Distributes a total gene budget evenly across ordered groups; the last
/// group receives the remainder.
pub fn genes_per_group_nonproportional(
    num_genes_total: usize,
    groups: &[String],
) -> Vec<(String, usize)> {
    let partition = if groups.is_empty() {
        0
    } else {
        num_genes_total / groups.len()
    };
    let mut result = Vec::with_capacity(groups.len());
    let mut allocated = 0;
    for (index, name) in groups.iter().enumerate() {
        let count = if index == groups.len() - 1 {
            num_genes_total - allocated
        } else {
            partition
        };
        allocated += count;
        result.push((name.clone(), count));
    }
    result
}

/// Selects the most variable probes of `matrix`.
///
/// Each column group ranks every matrix row by coefficient of variation over
/// the group's columns and contributes its budget's top rows; budgets come
/// from the proportional or even allocator. The result is the sorted,
/// de-duplicated union of selected row indices.
pub fn select_probes(
    matrix: &DataMatrix,
    num_genes_total: usize,
    column_groups: &[(String, Vec<usize>)],
    proportional: bool,
) -> Vec<usize> {
    let budgets = if proportional {
        let sizes: Vec<(String, usize)> = column_groups
            .iter()
            .map(|(name, columns)| (name.clone(), columns.len()))
            .collect();
        genes_per_group_proportional(num_genes_total, &sizes)
    } else {
        let names: Vec<String> = column_groups
            .iter()
            .map(|(name, _)| name.clone())
            .collect();
        genes_per_group_nonproportional(num_genes_total, &names)
    };

    let mut selected = Vec::new();
    for ((_, column_indexes), (_, budget)) in column_groups.iter().zip(budgets.iter()) {
        let group_cvs: Vec<f64> = (0..matrix.num_rows())
            .map(|row| {
                let row_values: Vec<f64> = column_indexes
                    .iter()
                    .map(|&column| matrix[(row, column)])
                    .collect();
                coefficient_of_variation(&row_values)
            })
            .collect();
        for &rank in order(&group_cvs).iter().take(*budget) {
            selected.push(rank - 1);
        }
    }
    selected.sort_unstable();
    selected.dedup();
    selected
}

/// Converts raw intensities into centered, scaled ratios, in place.
///
/// Per ordered group: each row is divided by its mean over the group's
/// control columns (controls resolved by name, missing names skipped), then
/// [`center_scale_filter`] centers and scales the group. A group without any
/// control columns produces NaN for all its values rather than an error.
pub fn intensities_to_ratios(
    matrix: &mut DataMatrix,
    control_names: &[String],
    column_groups: &[(String, Vec<usize>)],
) {
    let control_indexes: Vec<usize> = control_names
        .iter()
        .filter_map(|name| matrix.column_index_of(name))
        .collect();
    for (_, group_columns) in column_groups {
        let group_controls: Vec<usize> = control_indexes
            .iter()
            .copied()
            .filter(|index| group_columns.contains(index))
            .collect();
        let means: Vec<f64> = (0..matrix.num_rows())
            .map(|row| {
                let values: Vec<f64> = group_controls
                    .iter()
                    .map(|&column| matrix[(row, column)])
                    .collect();
                mean(&values)
            })
            .collect();
        for &column in group_columns {
            for row in 0..matrix.num_rows() {
                matrix[(row, column)] /= means[row];
            }
        }
        center_scale_filter(matrix, group_columns, &group_controls);
    }
}

/// Centers each row of the group's columns around the median of its control
/// values and scales by the sample standard deviation of its group values.
pub fn center_scale_filter(
    matrix: &mut DataMatrix,
    group_columns: &[usize],
    group_controls: &[usize],
) {
    let num_rows = matrix.num_rows();
    let centers: Vec<f64> = (0..num_rows)
        .map(|row| {
            let values: Vec<f64> = group_controls
                .iter()
                .map(|&column| matrix[(row, column)])
                .collect();
            median(&values)
        })
        .collect();
    let scale_factors: Vec<f64> = (0..num_rows)
        .map(|row| {
            let values: Vec<f64> = group_columns
                .iter()
                .map(|&column| matrix[(row, column)])
                .collect();
            sample_stddev(&values)
        })
        .collect();
    for row in 0..num_rows {
        for &column in group_columns {
            matrix[(row, column)] = (matrix[(row, column)] - centers[row]) / scale_factors[row];
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
