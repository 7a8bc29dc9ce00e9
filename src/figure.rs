//! Figure assembly.
//!
//! A figure is a rows × columns grid of panels, one per requested z-slice,
//! plus a single colorbar drawn from the shared [`DisplayBound`] and labelled
//! from zero up to it. One panel and many panels go through the same path.

use crate::boundary::{BoundaryMask, Connectivity};
use crate::colormap::Colormap;
use crate::error::{RenderError, Result};
use crate::lookup::LookupArray;
use crate::metrics::{DisplayBound, MetricTable};
use crate::style::{compose_panel, OverlayStyle};
use crate::volume::LabelVolume;
use embedded_graphics::mono_font::ascii::FONT_5X8;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use embedded_graphics::prelude::{DrawTarget, Drawable, OriginDimensions, Pixel, Point, Size};
use embedded_graphics::text::{Baseline, Text};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use ndarray::Axis;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use tracing::{debug, info};

/// Outer padding around the grid, in pixels.
pub const MARGIN: u32 = 8;
/// Spacing between panels and between the grid and the colorbar.
pub const GAP: u32 = 8;

const AXIS_COLOR: [u8; 3] = [0x33, 0x33, 0x33];
const COLORBAR_TICKS: u32 = 4;
const TICK_LENGTH: u32 = 3;
/// Space between a tick and its label.
const LABEL_PAD: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FigureLayout {
    pub rows: usize,
    pub cols: usize,
}

impl FigureLayout {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Single row wide enough for `n` panels.
    pub fn row(n: usize) -> Self {
        Self { rows: 1, cols: n }
    }

    pub fn cells(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    /// Fail unless `requested` panels fit.
    pub fn check(&self, requested: usize) -> Result<()> {
        if requested == 0 {
            return Err(RenderError::EmptySelection);
        }
        if requested > self.cells() {
            return Err(RenderError::LayoutInsufficient {
                requested,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    /// `(row, col)` of the `index`-th panel, row-major.
    fn cell(&self, index: usize) -> (usize, usize) {
        (index / self.cols, index % self.cols)
    }
}

/// Everything that shapes a figure besides the data itself.
#[derive(Debug, Clone)]
pub struct FigureParams {
    pub layout: FigureLayout,
    /// Integer upscaling applied to each panel.
    pub scale: u32,
    pub colormap: Colormap,
    /// Granularity of the colorbar's upper bound.
    pub round_to: f64,
    pub flip_x: bool,
    pub flip_y: bool,
    pub hide_axes: bool,
    pub background: [u8; 3],
    pub colorbar_width: u32,
    pub connectivity: Connectivity,
    pub overlay: OverlayStyle,
}

impl Default for FigureParams {
    fn default() -> Self {
        Self {
            layout: FigureLayout::new(1, 1),
            scale: 2,
            colormap: Colormap::default(),
            round_to: 500.0,
            flip_x: false,
            flip_y: false,
            hide_axes: false,
            background: [0xff, 0xff, 0xff],
            colorbar_width: 16,
            connectivity: Connectivity::default(),
            overlay: OverlayStyle::default(),
        }
    }
}

impl FigureParams {
    fn validate(&self) -> Result<()> {
        if self.scale == 0 {
            return Err(RenderError::InvalidParameter(
                "scale must be at least 1".to_string(),
            ));
        }
        if self.layout.rows == 0 || self.layout.cols == 0 {
            return Err(RenderError::InvalidParameter(format!(
                "layout {}x{} has no cells",
                self.layout.rows, self.layout.cols
            )));
        }
        Ok(())
    }
}

/// Render the requested slices into one figure.
///
/// Layout, parameters, lookup freshness and slice indices are all checked
/// before any panel is drawn.
pub fn render_figure(
    volume: &LabelVolume,
    table: &MetricTable,
    lookup: &LookupArray,
    z_indices: &[usize],
    params: &FigureParams,
) -> Result<RgbaImage> {
    params.validate()?;
    params.layout.check(z_indices.len())?;
    lookup.verify(volume, table)?;
    for &z in z_indices {
        if z >= volume.depth() {
            return Err(RenderError::SliceOutOfRange {
                index: z,
                depth: volume.depth(),
            });
        }
    }

    let bound =
        DisplayBound::from_corrected(table, lookup.correction_factor(), params.round_to)?;
    debug!(bound = bound.max, panels = z_indices.len(), "rendering figure");

    let panels = z_indices
        .iter()
        .map(|&z| render_panel(volume, lookup, z, bound, params))
        .collect::<Result<Vec<_>>>()?;

    let figure = assemble(&panels, bound, params)?;
    info!(
        width = figure.width(),
        height = figure.height(),
        panels = panels.len(),
        "rendered figure"
    );
    Ok(figure)
}

/// One slice as a colored, overlaid and upscaled panel.
///
/// Fails with [`RenderError::StaleLookup`] if `lookup` was built from a
/// different volume.
pub fn render_panel(
    volume: &LabelVolume,
    lookup: &LookupArray,
    z: usize,
    bound: DisplayBound,
    params: &FigureParams,
) -> Result<RgbaImage> {
    lookup.verify_volume(volume)?;
    let mut slice = volume.slice(z)?;
    if params.flip_y {
        slice.invert_axis(Axis(0));
    }
    if params.flip_x {
        slice.invert_axis(Axis(1));
    }

    let rendered = lookup.apply(slice)?;
    let mask = BoundaryMask::from_slice(slice, params.connectivity);
    let panel = compose_panel(&rendered, &mask, params.colormap, bound, &params.overlay)?;
    debug!(z, boundary_pixels = mask.marked_count(), "rendered panel");

    if params.scale == 1 {
        return Ok(panel);
    }
    let (Some(width), Some(height)) = (
        panel.width().checked_mul(params.scale),
        panel.height().checked_mul(params.scale),
    ) else {
        return Err(too_large("scaled panel"));
    };
    Ok(imageops::resize(&panel, width, height, FilterType::Nearest))
}

/// Place panels on the grid and draw the shared colorbar.
fn assemble(
    panels: &[RgbaImage],
    bound: DisplayBound,
    params: &FigureParams,
) -> Result<RgbaImage> {
    let (panel_w, panel_h) = panels
        .first()
        .map(|p| (p.width(), p.height()))
        .unwrap_or((0, 0));
    let rows = u32::try_from(params.layout.rows).map_err(|_| too_large("figure layout"))?;
    let cols = u32::try_from(params.layout.cols).map_err(|_| too_large("figure layout"))?;
    let grid_w = grid_extent(cols, panel_w).ok_or_else(|| too_large("figure width"))?;
    let grid_h = grid_extent(rows, panel_h).ok_or_else(|| too_large("figure height"))?;

    let width = [grid_w, GAP, params.colorbar_width, legend_width(bound), MARGIN]
        .into_iter()
        .try_fold(MARGIN, u32::checked_add)
        .ok_or_else(|| too_large("figure width"))?;
    let height = grid_h
        .checked_add(2 * MARGIN)
        .ok_or_else(|| too_large("figure height"))?;
    let [r, g, b] = params.background;
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([r, g, b, 0xff]));

    for (index, panel) in panels.iter().enumerate() {
        let (row, col) = params.layout.cell(index);
        let x = MARGIN + col as u32 * (panel_w + GAP);
        let y = MARGIN + row as u32 * (panel_h + GAP);
        imageops::replace(&mut canvas, panel, x as i64, y as i64);
        if !params.hide_axes {
            draw_frame(&mut canvas, x, y, panel_w, panel_h);
        }
    }

    let colorbar = draw_colorbar(params.colormap, params.colorbar_width, grid_h);
    let bar_x = MARGIN + grid_w + GAP;
    imageops::replace(&mut canvas, &colorbar, bar_x as i64, MARGIN as i64);
    let tick_x = bar_x + params.colorbar_width;
    if !params.hide_axes {
        draw_frame(&mut canvas, bar_x, MARGIN, params.colorbar_width, grid_h);
        draw_ticks(&mut canvas, tick_x, MARGIN, grid_h);
    }
    draw_labels(&mut canvas, tick_x + TICK_LENGTH + LABEL_PAD, MARGIN, grid_h, bound);
    debug!(bound = bound.max, "drew shared colorbar");
    Ok(canvas)
}

/// `count` cells of `size` pixels separated by [`GAP`], or `None` on overflow.
fn grid_extent(count: u32, size: u32) -> Option<u32> {
    count
        .checked_mul(size)?
        .checked_add(count.saturating_sub(1).checked_mul(GAP)?)
}

fn too_large(what: &str) -> RenderError {
    RenderError::InvalidParameter(format!("{what} does not fit in an image"))
}

/// Vertical gradient from the top of the scale (top row) down to zero.
///
/// Only the colormap and size shape the bar; the values it stands for are
/// the figure's shared bound, never any single panel's range.
pub fn draw_colorbar(colormap: Colormap, width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |_, y| {
        let t = if height <= 1 {
            1.0
        } else {
            1.0 - y as f64 / (height - 1) as f64
        };
        let [r, g, b] = colormap.sample(t);
        Rgba([r, g, b, 0xff])
    })
}

/// One-pixel frame just outside the `w × h` rectangle at `(x, y)`.
fn draw_frame(canvas: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32) {
    let [r, g, b] = AXIS_COLOR;
    let color = Rgba([r, g, b, 0xff]);
    let (left, top) = (x.saturating_sub(1), y.saturating_sub(1));
    let (right, bottom) = (x + w, y + h);
    for px in left..=right {
        put_if_inside(canvas, px, top, color);
        put_if_inside(canvas, px, bottom, color);
    }
    for py in top..=bottom {
        put_if_inside(canvas, left, py, color);
        put_if_inside(canvas, right, py, color);
    }
}

/// Row of the `i`-th tick, counted from the top of a bar `h` pixels tall.
fn tick_y(y: u32, h: u32, i: u32) -> u32 {
    let offset = u64::from(h.saturating_sub(1)) * u64::from(i) / u64::from(COLORBAR_TICKS);
    y.saturating_add(u32::try_from(offset).unwrap_or(u32::MAX))
}

fn draw_ticks(canvas: &mut RgbaImage, x: u32, y: u32, h: u32) {
    let [r, g, b] = AXIS_COLOR;
    let color = Rgba([r, g, b, 0xff]);
    for i in 0..=COLORBAR_TICKS {
        let py = tick_y(y, h, i);
        for dx in 0..TICK_LENGTH {
            put_if_inside(canvas, x + dx, py, color);
        }
    }
}

/// Tick values from the top of the scale down to zero.
pub fn colorbar_labels(bound: DisplayBound) -> Vec<String> {
    (0..=COLORBAR_TICKS)
        .map(|i| {
            let value = bound.max * f64::from(COLORBAR_TICKS - i) / f64::from(COLORBAR_TICKS);
            let text = format!("{:.2}", value);
            text.trim_end_matches('0').trim_end_matches('.').to_string()
        })
        .collect()
}

/// Pixels right of the colorbar taken by its ticks and labels.
pub fn legend_width(bound: DisplayBound) -> u32 {
    let glyph = FONT_5X8.character_size.width + FONT_5X8.character_spacing;
    let chars = colorbar_labels(bound)
        .iter()
        .map(|label| label.len())
        .max()
        .unwrap_or(0);
    let chars = u32::try_from(chars).unwrap_or(u32::MAX);
    TICK_LENGTH + LABEL_PAD + glyph.saturating_mul(chars)
}

/// Label each tick, left-aligned at `x` and vertically centred on the tick.
fn draw_labels(canvas: &mut RgbaImage, x: u32, y: u32, h: u32, bound: DisplayBound) {
    let [r, g, b] = AXIS_COLOR;
    let style = MonoTextStyle::new(&FONT_5X8, Rgb888::new(r, g, b));
    let mut target = CanvasTarget(canvas);
    for (i, label) in (0..).zip(colorbar_labels(bound)) {
        let (Ok(px), Ok(py)) = (i32::try_from(x), i32::try_from(tick_y(y, h, i))) else {
            continue;
        };
        Text::with_baseline(&label, Point::new(px, py), style, Baseline::Middle)
            .draw(&mut target)
            .unwrap_or_else(|never| match never {});
    }
}

/// Lets `embedded-graphics` text land directly on an RGBA canvas.
struct CanvasTarget<'a>(&'a mut RgbaImage);

impl OriginDimensions for CanvasTarget<'_> {
    fn size(&self) -> Size {
        Size::new(self.0.width(), self.0.height())
    }
}

impl DrawTarget for CanvasTarget<'_> {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> std::result::Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) {
                put_if_inside(self.0, x, y, Rgba([color.r(), color.g(), color.b(), 0xff]));
            }
        }
        Ok(())
    }
}

fn put_if_inside(canvas: &mut RgbaImage, x: u32, y: u32, color: Rgba<u8>) {
    if x < canvas.width() && y < canvas.height() {
        canvas.put_pixel(x, y, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn fixture() -> (LabelVolume, MetricTable, LookupArray) {
        let volume = LabelVolume::new(array![
            [[1, 1, 2], [1, 1, 2], [3, 3, 2]],
            [[2, 2, 2], [1, 1, 1], [3, 3, 3]]
        ]);
        let table =
            MetricTable::from_entries("density", [(1, 10.0), (2, 20.0), (3, 0.0)]).unwrap();
        let lookup = LookupArray::build(&volume, &table, 1.0).unwrap();
        (volume, table, lookup)
    }

    /// Bound of [`fixture`] at `round_to = 10`: labels run 30, 22.5, .. 0.
    fn fixture_legend() -> u32 {
        legend_width(DisplayBound { max: 30.0 })
    }

    fn params(rows: usize, cols: usize) -> FigureParams {
        FigureParams {
            layout: FigureLayout::new(rows, cols),
            scale: 1,
            round_to: 10.0,
            ..FigureParams::default()
        }
    }

    #[test]
    fn layout_rejects_too_many_slices() {
        let err = FigureLayout::new(2, 4).check(9).unwrap_err();
        assert!(matches!(
            err,
            RenderError::LayoutInsufficient {
                requested: 9,
                rows: 2,
                cols: 4
            }
        ));
        assert!(FigureLayout::new(2, 4).check(8).is_ok());
        assert!(matches!(
            FigureLayout::new(2, 4).check(0),
            Err(RenderError::EmptySelection)
        ));
    }

    #[test]
    fn layout_is_checked_before_slice_indices() {
        let (volume, table, lookup) = fixture();
        // Nine out-of-range indices: the layout error must win.
        let z: Vec<usize> = (100..109).collect();
        let err = render_figure(&volume, &table, &lookup, &z, &params(2, 4)).unwrap_err();
        assert!(matches!(err, RenderError::LayoutInsufficient { .. }));
    }

    #[test]
    fn single_panel_figure_size() {
        let (volume, table, lookup) = fixture();
        let figure = render_figure(&volume, &table, &lookup, &[0], &params(1, 1)).unwrap();
        assert_eq!(fixture_legend(), TICK_LENGTH + LABEL_PAD + 4 * 5);
        assert_eq!(figure.width(), MARGIN + 3 + GAP + 16 + fixture_legend() + MARGIN);
        assert_eq!(figure.height(), MARGIN + 3 + MARGIN);
    }

    #[test]
    fn grid_figure_size_and_scale() {
        let (volume, table, lookup) = fixture();
        let p = FigureParams {
            scale: 2,
            ..params(2, 3)
        };
        let figure = render_figure(&volume, &table, &lookup, &[0, 1, 0], &p).unwrap();
        let grid_w = 3 * 6 + 2 * GAP;
        let grid_h = 2 * 6 + GAP;
        assert_eq!(
            figure.width(),
            MARGIN + grid_w + GAP + 16 + fixture_legend() + MARGIN
        );
        assert_eq!(figure.height(), MARGIN + grid_h + MARGIN);
    }

    #[test]
    fn stale_lookup_is_rejected_before_rendering() {
        let (volume, _, lookup) = fixture();
        let edited = MetricTable::from_entries("density", [(1, 99.0)]).unwrap();
        let err = render_figure(&volume, &edited, &lookup, &[0], &params(1, 1)).unwrap_err();
        assert!(matches!(err, RenderError::StaleLookup(_)));
    }

    #[test]
    fn panel_rejects_lookup_from_another_volume() {
        let (volume, table, _) = fixture();
        let other = LabelVolume::new(array![[[1, 2], [3, 3]]]);
        let lookup = LookupArray::build(&other, &table, 1.0).unwrap();
        let bound = DisplayBound::from_table(&table, 10.0).unwrap();
        let err = render_panel(&volume, &lookup, 0, bound, &params(1, 1)).unwrap_err();
        assert!(matches!(err, RenderError::StaleLookup("label volume")));
    }

    #[test]
    fn correction_factor_moves_the_bound_with_the_values() {
        let volume = LabelVolume::new(array![[[1, 1], [1, 1]]]);
        let table = MetricTable::from_entries("density", [(1, 1000.0)]).unwrap();
        let p = FigureParams {
            colormap: Colormap::Gray,
            round_to: 100.0,
            hide_axes: true,
            overlay: OverlayStyle::new([0, 0, 0], 0.0, true).unwrap(),
            ..params(1, 1)
        };
        for factor in [0.1, 1.0, 10.0] {
            let lookup = LookupArray::build(&volume, &table, factor).unwrap();
            let figure = render_figure(&volume, &table, &lookup, &[0], &p).unwrap();

            let drawn = 1000.0 * factor;
            let bound = DisplayBound::from_corrected(&table, factor, 100.0).unwrap();
            assert!(drawn <= bound.max, "factor {factor}: {drawn} above {}", bound.max);

            let expected = Colormap::Gray.sample(bound.normalize(drawn));
            assert_ne!(expected, [255, 255, 255], "factor {factor} saturates");
            assert_eq!(figure.get_pixel(MARGIN, MARGIN).0[..3], expected);
        }
    }

    #[test]
    fn oversized_scale_is_rejected() {
        let (volume, table, lookup) = fixture();
        let p = FigureParams {
            scale: u32::MAX,
            ..params(1, 1)
        };
        let err = render_figure(&volume, &table, &lookup, &[0], &p).unwrap_err();
        assert!(matches!(err, RenderError::InvalidParameter(_)));
    }

    #[test]
    fn oversized_layout_is_rejected() {
        let (volume, table, lookup) = fixture();
        let err =
            render_figure(&volume, &table, &lookup, &[0], &params(1, usize::MAX)).unwrap_err();
        assert!(matches!(err, RenderError::InvalidParameter(_)));

        let wide = params(1, 1_000_000_000);
        let err = render_figure(&volume, &table, &lookup, &[0], &wide).unwrap_err();
        assert!(matches!(err, RenderError::InvalidParameter(_)));
    }

    #[test]
    fn slice_index_is_validated() {
        let (volume, table, lookup) = fixture();
        let err = render_figure(&volume, &table, &lookup, &[5], &params(1, 1)).unwrap_err();
        assert!(matches!(
            err,
            RenderError::SliceOutOfRange { index: 5, depth: 2 }
        ));
    }

    #[test]
    fn flip_x_mirrors_panel() {
        let (volume, table, lookup) = fixture();
        let bound = DisplayBound::from_table(&table, 10.0).unwrap();
        let plain = render_panel(&volume, &lookup, 0, bound, &params(1, 1)).unwrap();
        let flipped = render_panel(
            &volume,
            &lookup,
            0,
            bound,
            &FigureParams {
                flip_x: true,
                ..params(1, 1)
            },
        )
        .unwrap();
        assert_eq!(flipped, imageops::flip_horizontal(&plain));
    }

    #[test]
    fn flip_y_mirrors_panel() {
        let (volume, table, lookup) = fixture();
        let bound = DisplayBound::from_table(&table, 10.0).unwrap();
        let plain = render_panel(&volume, &lookup, 0, bound, &params(1, 1)).unwrap();
        let flipped = render_panel(
            &volume,
            &lookup,
            0,
            bound,
            &FigureParams {
                flip_y: true,
                ..params(1, 1)
            },
        )
        .unwrap();
        assert_eq!(flipped, imageops::flip_vertical(&plain));
    }

    #[test]
    fn hidden_axes_leave_background_around_panels() {
        let (volume, table, lookup) = fixture();
        let p = FigureParams {
            hide_axes: true,
            ..params(1, 1)
        };
        let figure = render_figure(&volume, &table, &lookup, &[0], &p).unwrap();
        assert_eq!(figure.get_pixel(MARGIN - 1, MARGIN - 1).0, [255, 255, 255, 255]);

        let framed = render_figure(&volume, &table, &lookup, &[0], &params(1, 1)).unwrap();
        assert_eq!(framed.get_pixel(MARGIN - 1, MARGIN - 1).0, [0x33, 0x33, 0x33, 255]);
    }

    #[test]
    fn colorbar_runs_from_top_of_scale_to_zero() {
        let bar = draw_colorbar(Colormap::Gray, 4, 11);
        assert_eq!(bar.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(bar.get_pixel(3, 10).0, [0, 0, 0, 255]);
    }

    #[test]
    fn colorbar_labels_run_from_bound_to_zero() {
        assert_eq!(
            colorbar_labels(DisplayBound { max: 2000.0 }),
            ["2000", "1500", "1000", "500", "0"]
        );
        assert_eq!(
            colorbar_labels(DisplayBound { max: 30.0 }),
            ["30", "22.5", "15", "7.5", "0"]
        );
    }

    #[test]
    fn labels_depend_on_the_bound() {
        let legend = |max: f64| {
            let bound = DisplayBound { max };
            let mut canvas = RgbaImage::from_pixel(legend_width(bound), 40, Rgba([0xff; 4]));
            draw_labels(&mut canvas, 0, 4, 32, bound);
            canvas
        };
        let low = legend(2000.0);
        let high = legend(3000.0);
        assert_eq!(low.dimensions(), high.dimensions());
        assert_ne!(low, high);
        assert!(low.pixels().any(|p| p.0 == [0x33, 0x33, 0x33, 0xff]));
    }

    #[test]
    fn figure_labels_its_colorbar_even_without_axes() {
        let (volume, table, lookup) = fixture();
        let p = FigureParams {
            hide_axes: true,
            ..params(1, 1)
        };
        let figure = render_figure(&volume, &table, &lookup, &[0], &p).unwrap();
        let legend_x = MARGIN + 3 + GAP + 16;
        let ink = (legend_x..legend_x + fixture_legend())
            .flat_map(|x| (0..figure.height()).map(move |y| (x, y)))
            .any(|(x, y)| figure.get_pixel(x, y).0 == [0x33, 0x33, 0x33, 0xff]);
        assert!(ink);
    }

    #[test]
    fn equal_values_share_a_color_across_panels() {
        let (volume, table, lookup) = fixture();
        let p = FigureParams {
            overlay: OverlayStyle::new([0, 0, 0], 0.0, true).unwrap(),
            hide_axes: true,
            ..params(1, 2)
        };
        let figure = render_figure(&volume, &table, &lookup, &[0, 1], &p).unwrap();
        // Region 1 sits at (0,0) in slice 0 and at (1,0) in slice 1.
        let left = figure.get_pixel(MARGIN, MARGIN);
        let right = figure.get_pixel(MARGIN + 3 + GAP, MARGIN + 1);
        assert_eq!(left, right);
    }

    #[test]
    fn colorbar_ignores_which_panels_are_drawn() {
        // The colorbar stands for the table-wide bound. If panels ever get
        // their own color scales this coupling has to be revisited.
        let (volume, table, lookup) = fixture();
        let p = params(1, 1);
        let a = render_figure(&volume, &table, &lookup, &[0], &p).unwrap();
        let b = render_figure(&volume, &table, &lookup, &[1], &p).unwrap();
        let bar_x = MARGIN + 3 + GAP;
        for y in MARGIN..MARGIN + 3 {
            for x in bar_x..bar_x + 16 {
                assert_eq!(a.get_pixel(x, y), b.get_pixel(x, y));
            }
        }
    }
}
