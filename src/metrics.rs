//! Per-region metric tables.
//!
//! A metric table maps region ids to one non-negative scalar per region,
//! such as detected cell density or mean intensity. Tables are read from
//! CSV files with an `id` column and a selectable metric column.
//!
//! The display bound shared by every panel of a figure is derived here,
//! from the table alone, so that color scales stay comparable.

use crate::error::{RenderError, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Name of the region id column.
pub const ID_COLUMN: &str = "id";

/// Headroom applied above the largest metric value.
pub const BOUND_HEADROOM: f64 = 1.1;

/// Region id → metric value.
#[derive(Debug, Clone)]
pub struct MetricTable {
    column: String,
    values: BTreeMap<u32, f64>,
    fingerprint: [u8; 32],
}

impl MetricTable {
    /// Build a table from `(id, value)` pairs.
    ///
    /// Values must be finite and non-negative, and each id may appear once.
    pub fn from_entries<I>(column: &str, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u32, f64)>,
    {
        let mut values = BTreeMap::new();
        for (id, value) in entries {
            if !value.is_finite() || value < 0.0 {
                return Err(RenderError::InvalidTable(format!(
                    "region {} has {} = {}, expected a finite non-negative value",
                    id, column, value
                )));
            }
            if values.insert(id, value).is_some() {
                return Err(RenderError::InvalidTable(format!(
                    "region {} appears more than once",
                    id
                )));
            }
        }
        let fingerprint = fingerprint_values(column, &values);
        Ok(Self {
            column: column.to_string(),
            values,
            fingerprint,
        })
    }

    /// Read a CSV file, taking values from `column`.
    pub fn open(path: &Path, column: &str) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_reader(file, column).map_err(|err| match err {
            RenderError::Csv { source, .. } => RenderError::Csv {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        info!(
            path = %path.display(),
            column,
            regions = table.len(),
            "loaded metric table"
        );
        Ok(table)
    }

    /// Parse CSV from any reader. The header row must contain `id` and `column`.
    pub fn from_reader<R: Read>(reader: R, column: &str) -> Result<Self> {
        let csv_err = |source: csv::Error| RenderError::Csv {
            path: Default::default(),
            source,
        };
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers().map_err(csv_err)?.clone();
        let position = |name: &str| headers.iter().position(|h| h == name);
        let available = || headers.iter().collect::<Vec<_>>().join(", ");
        let id_idx = position(ID_COLUMN).ok_or_else(|| RenderError::UnknownColumn {
            column: ID_COLUMN.to_string(),
            available: available(),
        })?;
        let value_idx = position(column).ok_or_else(|| RenderError::UnknownColumn {
            column: column.to_string(),
            available: available(),
        })?;

        let mut entries = Vec::new();
        for (row, record) in rdr.records().enumerate() {
            let record = record.map_err(csv_err)?;
            let raw_id = record.get(id_idx).unwrap_or("");
            let raw_value = record.get(value_idx).unwrap_or("");
            let id: u32 = raw_id.parse().map_err(|_| {
                RenderError::InvalidTable(format!(
                    "row {}: '{}' is not a non-negative integer region id",
                    row + 1,
                    raw_id
                ))
            })?;
            let value: f64 = raw_value.parse().map_err(|_| {
                RenderError::InvalidTable(format!(
                    "row {}: '{}' is not a number in column '{}'",
                    row + 1,
                    raw_value,
                    column
                ))
            })?;
            entries.push((id, value));
        }
        debug!(rows = entries.len(), column, "parsed metric rows");
        Self::from_entries(column, entries)
    }

    /// Name of the metric column the values came from.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Metric for a region, if present.
    pub fn get(&self, id: u32) -> Option<f64> {
        self.values.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entries in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.values.iter().map(|(&id, &v)| (id, v))
    }

    /// Largest metric value, or 0 for an empty table.
    pub fn max_value(&self) -> f64 {
        self.values.values().copied().fold(0.0, f64::max)
    }

    pub fn fingerprint(&self) -> &[u8; 32] {
        &self.fingerprint
    }
}

fn fingerprint_values(column: &str, values: &BTreeMap<u32, f64>) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(column.as_bytes());
    for (id, value) in values {
        hasher.update(id.to_le_bytes());
        hasher.update(value.to_bits().to_le_bytes());
    }
    hasher.finalize().into()
}

/// Upper limit of the color scale, shared across all panels of a figure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DisplayBound {
    pub max: f64,
}

impl DisplayBound {
    /// `round_to * (round(max * 1.1 / round_to) + 1)`, rounding half to even.
    pub fn from_max(max_value: f64, round_to: f64) -> Result<Self> {
        if !round_to.is_finite() || round_to <= 0.0 {
            return Err(RenderError::InvalidParameter(format!(
                "round_to must be a positive number, got {}",
                round_to
            )));
        }
        let steps = (max_value * BOUND_HEADROOM / round_to).round_ties_even();
        Ok(Self {
            max: round_to * (steps + 1.0),
        })
    }

    pub fn from_table(table: &MetricTable, round_to: f64) -> Result<Self> {
        Self::from_max(table.max_value(), round_to)
    }

    /// Bound over the values a lookup actually draws, `metric * correction_factor`.
    pub fn from_corrected(
        table: &MetricTable,
        correction_factor: f64,
        round_to: f64,
    ) -> Result<Self> {
        Self::from_max(table.max_value() * correction_factor, round_to)
    }

    /// Map a metric value onto `[0, 1]` of the color scale.
    pub fn normalize(&self, value: f64) -> f64 {
        (value / self.max).clamp(0.0, 1.0)
    }
}
