//! Dense region id → metric lookup.
//!
//! Built once per (volume, table, correction factor) and shared by every
//! slice rendered from that pair. The lookup remembers the fingerprints of
//! its inputs; rendering with a different volume or table is rejected.

use crate::error::{RenderError, Result};
use crate::metrics::MetricTable;
use crate::volume::{LabelVolume, BACKGROUND_ID};
use ndarray::{Array2, ArrayView2};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct LookupArray {
    values: Vec<f64>,
    correction_factor: f64,
    volume_fingerprint: [u8; 32],
    table_fingerprint: [u8; 32],
}

impl LookupArray {
    /// Index `i` holds `table[i] * correction_factor`, or 0 when `i` is
    /// absent from the table. Index 0 is always 0.
    pub fn build(
        volume: &LabelVolume,
        table: &MetricTable,
        correction_factor: f64,
    ) -> Result<Self> {
        if !correction_factor.is_finite() || correction_factor < 0.0 {
            return Err(RenderError::InvalidParameter(format!(
                "correction factor must be finite and non-negative, got {}",
                correction_factor
            )));
        }

        let len = volume.max_id() as usize + 1;
        let mut values = vec![0.0; len];
        let mut ignored = 0usize;
        for (id, value) in table.iter() {
            match values.get_mut(id as usize) {
                Some(slot) => *slot = value * correction_factor,
                None => ignored += 1,
            }
        }
        values[BACKGROUND_ID as usize] = 0.0;

        if ignored > 0 {
            warn!(
                ignored,
                max_id = volume.max_id(),
                "metric table has ids above the volume's largest label"
            );
        }
        debug!(len, correction_factor, "built lookup array");

        Ok(Self {
            values,
            correction_factor,
            volume_fingerprint: *volume.fingerprint(),
            table_fingerprint: *table.fingerprint(),
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn correction_factor(&self) -> f64 {
        self.correction_factor
    }

    pub fn get(&self, id: u32) -> Option<f64> {
        self.values.get(id as usize).copied()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Fail unless this lookup was built from exactly these inputs.
    pub fn verify(&self, volume: &LabelVolume, table: &MetricTable) -> Result<()> {
        self.verify_volume(volume)?;
        if &self.table_fingerprint != table.fingerprint() {
            return Err(RenderError::StaleLookup("metric table"));
        }
        Ok(())
    }

    pub fn verify_volume(&self, volume: &LabelVolume) -> Result<()> {
        if &self.volume_fingerprint != volume.fingerprint() {
            return Err(RenderError::StaleLookup("label volume"));
        }
        Ok(())
    }

    /// Substitute every label in `slice` with its metric value.
    pub fn apply(&self, slice: ArrayView2<'_, u32>) -> Result<Array2<f64>> {
        if let Some(&label) = slice.iter().find(|&&id| id as usize >= self.values.len()) {
            return Err(RenderError::LabelOutOfRange {
                label,
                len: self.values.len(),
            });
        }
        Ok(slice.mapv(|id| self.values[id as usize]))
    }
}
