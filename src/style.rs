//! Overlay styling and single-panel compositing.

use crate::boundary::BoundaryMask;
use crate::colormap::Colormap;
use crate::error::{RenderError, Result};
use crate::metrics::DisplayBound;
use image::{Rgba, RgbaImage};
use ndarray::Array2;

/// How the boundary mask is drawn over the heatmap.
///
/// Passed explicitly to every render call; there is no process-wide
/// "current colormap" whose transparency could leak between figures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    pub line_color: [u8; 3],
    /// Opacity of the overlay layer, in `[0, 1]`.
    pub alpha: f32,
    /// Leave unmarked pixels fully transparent. When false they are
    /// darkened as if the overlay had an opaque black background.
    pub transparent_unmarked: bool,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            line_color: [0xff, 0xff, 0xff],
            alpha: 0.45,
            transparent_unmarked: true,
        }
    }
}

impl OverlayStyle {
    pub fn new(line_color: [u8; 3], alpha: f32, transparent_unmarked: bool) -> Result<Self> {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(RenderError::InvalidParameter(format!(
                "overlay alpha must be within [0, 1], got {}",
                alpha
            )));
        }
        Ok(Self {
            line_color,
            alpha,
            transparent_unmarked,
        })
    }

    /// Color drawn for a pixel whose heatmap color is `base`.
    fn over(&self, base: [u8; 3], marked: bool) -> [u8; 3] {
        let layer = if marked {
            self.line_color
        } else if self.transparent_unmarked {
            return base;
        } else {
            [0, 0, 0]
        };
        let a = self.alpha;
        let mut out = [0u8; 3];
        for ch in 0..3 {
            let v = layer[ch] as f32 * a + base[ch] as f32 * (1.0 - a);
            out[ch] = v.round().clamp(0.0, 255.0) as u8;
        }
        out
    }
}

/// Color a rendered slice and layer its boundary mask on top.
pub fn compose_panel(
    rendered: &Array2<f64>,
    mask: &BoundaryMask,
    colormap: Colormap,
    bound: DisplayBound,
    style: &OverlayStyle,
) -> Result<RgbaImage> {
    if rendered.dim() != mask.dim() {
        return Err(RenderError::InvalidParameter(format!(
            "rendered slice is {:?} but boundary mask is {:?}",
            rendered.dim(),
            mask.dim()
        )));
    }
    let (rows, cols) = rendered.dim();
    let mut panel = RgbaImage::new(cols as u32, rows as u32);
    for ((r, c), &value) in rendered.indexed_iter() {
        let base = colormap.sample(bound.normalize(value));
        let [red, green, blue] = style.over(base, mask.is_marked(r, c));
        panel.put_pixel(c as u32, r as u32, Rgba([red, green, blue, 0xff]));
    }
    Ok(panel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn rejects_alpha_outside_unit_range() {
        assert!(OverlayStyle::new([0, 0, 0], 1.5, true).is_err());
        assert!(OverlayStyle::new([0, 0, 0], -0.1, true).is_err());
        assert!(OverlayStyle::new([0, 0, 0], 0.4, true).is_ok());
    }

    #[test]
    fn unmarked_pixels_keep_heatmap_color() {
        let rendered = array![[0.0, 100.0]];
        let mask = BoundaryMask::thin(array![[1u32, 1]].view(), Default::default());
        let bound = DisplayBound { max: 100.0 };
        let panel = compose_panel(
            &rendered,
            &mask,
            Colormap::Gray,
            bound,
            &OverlayStyle::default(),
        )
        .unwrap();
        assert_eq!(panel.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(panel.get_pixel(1, 0).0, [255, 255, 255, 255]);
    }

    #[test]
    fn marked_pixels_blend_line_color() {
        let rendered = array![[0.0, 0.0]];
        let mask = BoundaryMask::thin(array![[1u32, 2]].view(), Default::default());
        let style = OverlayStyle::new([200, 100, 0], 0.5, true).unwrap();
        let panel = compose_panel(
            &rendered,
            &mask,
            Colormap::Gray,
            DisplayBound { max: 10.0 },
            &style,
        )
        .unwrap();
        assert_eq!(panel.get_pixel(0, 0).0, [100, 50, 0, 255]);
    }

    #[test]
    fn opaque_overlay_darkens_unmarked_pixels() {
        let rendered = array![[10.0]];
        let mask = BoundaryMask::thin(array![[1u32]].view(), Default::default());
        let style = OverlayStyle::new([255, 255, 255], 0.5, false).unwrap();
        let panel = compose_panel(
            &rendered,
            &mask,
            Colormap::Gray,
            DisplayBound { max: 10.0 },
            &style,
        )
        .unwrap();
        assert_eq!(panel.get_pixel(0, 0).0, [128, 128, 128, 255]);
    }

    #[test]
    fn mismatched_shapes_fail() {
        let rendered = array![[0.0, 0.0]];
        let mask = BoundaryMask::thin(array![[1u32]].view(), Default::default());
        assert!(compose_panel(
            &rendered,
            &mask,
            Colormap::Gray,
            DisplayBound { max: 1.0 },
            &OverlayStyle::default(),
        )
        .is_err());
    }
}
