//! Coverage summary of a (volume, table) pair.

use crate::metrics::{DisplayBound, MetricTable};
use crate::volume::LabelVolume;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    /// `(depth, height, width)`.
    pub shape: (usize, usize, usize),
    pub max_id: u32,
    pub metric_column: String,
    /// Non-background regions present in the volume.
    pub regions_in_volume: usize,
    pub regions_in_table: usize,
    /// Volume regions with a table entry.
    pub covered: usize,
    /// Volume regions rendered as zero because the table lacks them.
    pub missing_from_table: Vec<u32>,
    /// Table ids that never appear in the volume.
    pub unused_table_ids: usize,
    pub correction_factor: f64,
    /// Largest drawn value, after the correction factor.
    pub max_value: f64,
    pub display_bound: DisplayBound,
}

impl Summary {
    pub fn new(
        volume: &LabelVolume,
        table: &MetricTable,
        correction_factor: f64,
        bound: DisplayBound,
    ) -> Self {
        let in_volume = volume.region_ids();
        let missing_from_table: Vec<u32> = in_volume
            .iter()
            .copied()
            .filter(|&id| table.get(id).is_none())
            .collect();
        let unused_table_ids = table
            .iter()
            .filter(|(id, _)| !in_volume.contains(id))
            .count();

        Self {
            shape: volume.shape(),
            max_id: volume.max_id(),
            metric_column: table.column().to_string(),
            regions_in_volume: in_volume.len(),
            regions_in_table: table.len(),
            covered: in_volume.len() - missing_from_table.len(),
            missing_from_table,
            unused_table_ids,
            correction_factor,
            max_value: table.max_value() * correction_factor,
            display_bound: bound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn counts_coverage_both_ways() {
        let volume = LabelVolume::new(array![[[0, 1, 2], [3, 3, 2]]]);
        let table = MetricTable::from_entries("density", [(1, 4.0), (2, 8.0), (9, 1.0)]).unwrap();
        let bound = DisplayBound::from_corrected(&table, 1.0, 5.0).unwrap();
        let summary = Summary::new(&volume, &table, 1.0, bound);

        assert_eq!(summary.regions_in_volume, 3);
        assert_eq!(summary.covered, 2);
        assert_eq!(summary.missing_from_table, vec![3]);
        assert_eq!(summary.unused_table_ids, 1);
        assert_eq!(summary.max_value, 8.0);
        assert_eq!(summary.display_bound.max, 15.0);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["metric_column"], "density");
    }

    #[test]
    fn scale_reports_corrected_values() {
        let volume = LabelVolume::new(array![[[0, 1, 2]]]);
        let table = MetricTable::from_entries("density", [(1, 4.0), (2, 8.0)]).unwrap();
        let bound = DisplayBound::from_corrected(&table, 10.0, 5.0).unwrap();
        let summary = Summary::new(&volume, &table, 10.0, bound);

        assert_eq!(summary.max_value, 80.0);
        assert_eq!(summary.display_bound.max, 95.0);
        assert!(summary.max_value <= summary.display_bound.max);
    }
}
