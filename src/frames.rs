//! Numbered frame export for animations.
//!
//! Each z-slice becomes one single-panel figure written as
//! `<prefix>_<NNNN>.png`. Frames are rendered in parallel; nothing is
//! written until every frame has rendered successfully.

use crate::error::{RenderError, Result};
use crate::figure::{render_figure, FigureLayout, FigureParams};
use crate::lookup::LookupArray;
use crate::metrics::MetricTable;
use crate::volume::LabelVolume;
use image::{ImageFormat, Rgba, RgbaImage};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSettings {
    pub prefix: String,
    /// Zero-padded width of the frame number.
    pub digits: usize,
    /// Pad each frame to even width and height for video encoders.
    pub even_dimensions: bool,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            prefix: "img".to_string(),
            digits: 4,
            even_dimensions: false,
        }
    }
}

impl FrameSettings {
    pub fn file_name(&self, index: usize) -> String {
        format!("{}_{:0width$}.png", self.prefix, index, width = self.digits)
    }
}

/// Render one frame per z-index into `out_dir`; returns paths in order.
pub fn export_frames(
    volume: &LabelVolume,
    table: &MetricTable,
    lookup: &LookupArray,
    z_indices: &[usize],
    params: &FigureParams,
    out_dir: &Path,
    settings: &FrameSettings,
) -> Result<Vec<PathBuf>> {
    if z_indices.is_empty() {
        return Err(RenderError::EmptySelection);
    }
    let frame_params = FigureParams {
        layout: FigureLayout::row(1),
        ..params.clone()
    };

    let frames = z_indices
        .par_iter()
        .map(|&z| -> Result<RgbaImage> {
            let frame = render_figure(volume, table, lookup, &[z], &frame_params)?;
            Ok(if settings.even_dimensions {
                pad_to_even(&frame, params.background)
            } else {
                frame
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let paths = frames
        .par_iter()
        .enumerate()
        .map(|(index, frame)| -> Result<PathBuf> {
            let path = out_dir.join(settings.file_name(index));
            save_png(frame, &path)?;
            Ok(path)
        })
        .collect::<Result<Vec<_>>>()?;

    info!(
        frames = paths.len(),
        dir = %out_dir.display(),
        "exported frame sequence"
    );
    Ok(paths)
}

/// Grow the image by at most one pixel per axis so both sides are even.
pub fn pad_to_even(image: &RgbaImage, background: [u8; 3]) -> RgbaImage {
    let width = image.width() + image.width() % 2;
    let height = image.height() + image.height() % 2;
    if (width, height) == image.dimensions() {
        return image.clone();
    }
    let [r, g, b] = background;
    let mut padded = RgbaImage::from_pixel(width, height, Rgba([r, g, b, 0xff]));
    image::imageops::replace(&mut padded, image, 0, 0);
    padded
}

/// Write a PNG, creating parent directories as needed.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| RenderError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| RenderError::Image {
            path: path.to_path_buf(),
            source,
        })
}
