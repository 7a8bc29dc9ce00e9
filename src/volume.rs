//! Label volumes: 3D arrays of region ids, one page per z-slice.
//!
//! A volume is immutable once built. Its content fingerprint is computed
//! at construction so a [`LookupArray`](crate::lookup::LookupArray) can
//! tell whether it was built from this exact volume.

use crate::error::{RenderError, Result};
use ndarray::{Array3, ArrayView2, Axis};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tracing::{debug, info};

/// Region id reserved for background / "no region".
pub const BACKGROUND_ID: u32 = 0;

/// A segmented annotation volume indexed as `(z, y, x)`.
#[derive(Debug, Clone)]
pub struct LabelVolume {
    labels: Array3<u32>,
    max_id: u32,
    fingerprint: [u8; 32],
}

impl LabelVolume {
    /// Wrap an existing label array.
    pub fn new(labels: Array3<u32>) -> Self {
        let max_id = labels.iter().copied().max().unwrap_or(BACKGROUND_ID);
        let fingerprint = fingerprint_labels(&labels);
        Self {
            labels,
            max_id,
            fingerprint,
        }
    }

    /// Read a multi-page TIFF, one page per z-slice.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let volume = Self::from_reader(BufReader::new(file)).map_err(|err| match err {
            RenderError::Tiff { source, .. } => RenderError::Tiff {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        info!(
            path = %path.display(),
            shape = ?volume.shape(),
            max_id = volume.max_id,
            "loaded label volume"
        );
        Ok(volume)
    }

    /// Decode a multi-page TIFF from any seekable reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let tiff_err = |source: tiff::TiffError| RenderError::Tiff {
            path: Default::default(),
            source,
        };
        let mut decoder = Decoder::new(reader).map_err(tiff_err)?;

        let mut pages: Vec<Vec<u32>> = Vec::new();
        let mut dims: Option<(u32, u32)> = None;
        loop {
            let page_dims = decoder.dimensions().map_err(tiff_err)?;
            match dims {
                None => dims = Some(page_dims),
                Some(first) if first != page_dims => {
                    return Err(RenderError::InvalidVolume(format!(
                        "page {} is {}x{} but page 0 is {}x{}",
                        pages.len(),
                        page_dims.0,
                        page_dims.1,
                        first.0,
                        first.1
                    )));
                }
                Some(_) => {}
            }
            let page = decoder.read_image().map_err(tiff_err)?;
            pages.push(page_to_labels(page, pages.len())?);
            debug!(page = pages.len() - 1, "decoded label page");

            if !decoder.more_images() {
                break;
            }
            decoder.next_image().map_err(tiff_err)?;
        }

        let (width, height) = dims.unwrap_or((0, 0));
        let depth = pages.len();
        let data: Vec<u32> = pages.into_iter().flatten().collect();
        let labels = Array3::from_shape_vec((depth, height as usize, width as usize), data)
            .map_err(|e| RenderError::InvalidVolume(e.to_string()))?;
        Ok(Self::new(labels))
    }

    /// `(depth, height, width)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        self.labels.dim()
    }

    pub fn depth(&self) -> usize {
        self.labels.len_of(Axis(0))
    }

    /// Largest region id present.
    pub fn max_id(&self) -> u32 {
        self.max_id
    }

    pub fn labels(&self) -> &Array3<u32> {
        &self.labels
    }

    pub fn fingerprint(&self) -> &[u8; 32] {
        &self.fingerprint
    }

    /// Borrow the z-th slice.
    pub fn slice(&self, z: usize) -> Result<ArrayView2<'_, u32>> {
        if z >= self.depth() {
            return Err(RenderError::SliceOutOfRange {
                index: z,
                depth: self.depth(),
            });
        }
        Ok(self.labels.index_axis(Axis(0), z))
    }

    /// Distinct non-background region ids present in the volume.
    pub fn region_ids(&self) -> BTreeSet<u32> {
        self.labels
            .iter()
            .copied()
            .filter(|&id| id != BACKGROUND_ID)
            .collect()
    }
}

fn fingerprint_labels(labels: &Array3<u32>) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for dim in labels.shape() {
        hasher.update((*dim as u64).to_le_bytes());
    }
    for id in labels.iter() {
        hasher.update(id.to_le_bytes());
    }
    hasher.finalize().into()
}

fn page_to_labels(page: DecodingResult, index: usize) -> Result<Vec<u32>> {
    fn signed<T: Copy + Into<i64>>(data: Vec<T>, index: usize) -> Result<Vec<u32>> {
        data.into_iter()
            .map(|v| {
                let v: i64 = v.into();
                u32::try_from(v).map_err(|_| {
                    RenderError::InvalidVolume(format!(
                        "page {} holds label {} outside 0..={}",
                        index,
                        v,
                        u32::MAX
                    ))
                })
            })
            .collect()
    }

    match page {
        DecodingResult::U8(data) => Ok(data.into_iter().map(u32::from).collect()),
        DecodingResult::U16(data) => Ok(data.into_iter().map(u32::from).collect()),
        DecodingResult::U32(data) => Ok(data),
        DecodingResult::U64(data) => data
            .into_iter()
            .map(|v| {
                u32::try_from(v).map_err(|_| {
                    RenderError::InvalidVolume(format!(
                        "page {} holds label {} outside 0..={}",
                        index,
                        v,
                        u32::MAX
                    ))
                })
            })
            .collect(),
        DecodingResult::I8(data) => signed(data, index),
        DecodingResult::I16(data) => signed(data, index),
        DecodingResult::I32(data) => signed(data, index),
        DecodingResult::I64(data) => signed(data, index),
        DecodingResult::F32(_) | DecodingResult::F64(_) => Err(RenderError::InvalidVolume(
            format!("page {} stores floating point samples, expected integer labels", index),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn sample() -> LabelVolume {
        LabelVolume::new(array![
            [[1, 1, 2], [1, 1, 2], [3, 3, 2]],
            [[0, 0, 4], [0, 5, 4], [0, 0, 0]]
        ])
    }

    #[test]
    fn reports_shape_and_max_id() {
        let volume = sample();
        assert_eq!(volume.shape(), (2, 3, 3));
        assert_eq!(volume.max_id(), 5);
        assert_eq!(
            volume.region_ids().into_iter().collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 5]
        );
    }

    #[test]
    fn slice_out_of_range_fails() {
        let err = sample().slice(2).unwrap_err();
        assert!(matches!(
            err,
            RenderError::SliceOutOfRange { index: 2, depth: 2 }
        ));
    }

    #[test]
    fn fingerprint_tracks_content() {
        let a = sample();
        let b = sample();
        assert_eq!(a.fingerprint(), b.fingerprint());

        let mut labels = a.labels().clone();
        labels[[1, 1, 1]] = 6;
        let c = LabelVolume::new(labels);
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn fingerprint_includes_shape() {
        let flat = LabelVolume::new(Array3::zeros((1, 2, 3)));
        let tall = LabelVolume::new(Array3::zeros((1, 3, 2)));
        assert_ne!(flat.fingerprint(), tall.fingerprint());
    }

    #[test]
    fn negative_signed_labels_are_rejected() {
        let err = page_to_labels(DecodingResult::I16(vec![1, -2, 3]), 0).unwrap_err();
        assert!(err.to_string().contains("-2"));
    }

    #[test]
    fn float_pages_are_rejected() {
        let err = page_to_labels(DecodingResult::F32(vec![1.0]), 3).unwrap_err();
        assert!(matches!(err, RenderError::InvalidVolume(_)));
    }
}
