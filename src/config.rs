//! Configuration loading for regionheat.
//!
//! Configuration is loaded from TOML files with environment variable overrides.
//! Every value can also be overridden per call from the command line.

use crate::boundary::Connectivity;
use crate::colormap::{parse_hex_color, Colormap};
use crate::figure::{FigureLayout, FigureParams};
use crate::frames::FrameSettings;
use crate::style::OverlayStyle;
use anyhow::{anyhow, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "config.default.toml";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RegionHeatConfig {
    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub figure: FigureConfig,

    #[serde(default)]
    pub overlay: OverlayConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_metric_column")]
    pub metric_column: String,

    #[serde(default = "default_correction_factor")]
    pub correction_factor: f64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            metric_column: default_metric_column(),
            correction_factor: default_correction_factor(),
        }
    }
}

fn default_metric_column() -> String {
    "density".to_string()
}

fn default_correction_factor() -> f64 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct FigureConfig {
    #[serde(default = "default_one")]
    pub rows: usize,

    #[serde(default = "default_one")]
    pub cols: usize,

    #[serde(default = "default_scale")]
    pub scale: u32,

    #[serde(default = "default_colormap")]
    pub colormap: String,

    #[serde(default = "default_round_to")]
    pub round_to: f64,

    #[serde(default)]
    pub flip_x: bool,

    #[serde(default)]
    pub flip_y: bool,

    #[serde(default)]
    pub hide_axes: bool,

    #[serde(default = "default_background")]
    pub background: String,

    #[serde(default = "default_colorbar_width")]
    pub colorbar_width: u32,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            rows: default_one(),
            cols: default_one(),
            scale: default_scale(),
            colormap: default_colormap(),
            round_to: default_round_to(),
            flip_x: false,
            flip_y: false,
            hide_axes: false,
            background: default_background(),
            colorbar_width: default_colorbar_width(),
        }
    }
}

fn default_one() -> usize {
    1
}

fn default_scale() -> u32 {
    2
}

fn default_colormap() -> String {
    "viridis".to_string()
}

fn default_round_to() -> f64 {
    500.0
}

fn default_background() -> String {
    "#ffffff".to_string()
}

fn default_colorbar_width() -> u32 {
    16
}

#[derive(Debug, Clone, Deserialize)]
pub struct OverlayConfig {
    #[serde(default = "default_connectivity")]
    pub connectivity: u8,

    #[serde(default = "default_line_color")]
    pub line_color: String,

    #[serde(default = "default_alpha")]
    pub alpha: f32,

    #[serde(default = "default_true")]
    pub transparent_unmarked: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            connectivity: default_connectivity(),
            line_color: default_line_color(),
            alpha: default_alpha(),
            transparent_unmarked: true,
        }
    }
}

fn default_connectivity() -> u8 {
    4
}

fn default_line_color() -> String {
    "#ffffff".to_string()
}

fn default_alpha() -> f32 {
    0.45
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_directory")]
    pub directory: String,

    #[serde(default = "default_frame_prefix")]
    pub frame_prefix: String,

    #[serde(default = "default_frame_digits")]
    pub frame_digits: usize,

    #[serde(default)]
    pub even_dimensions: bool,

    #[serde(default)]
    pub save_summary: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            frame_prefix: default_frame_prefix(),
            frame_digits: default_frame_digits(),
            even_dimensions: false,
            save_summary: false,
        }
    }
}

fn default_directory() -> String {
    "output".to_string()
}

fn default_frame_prefix() -> String {
    "img".to_string()
}

fn default_frame_digits() -> usize {
    4
}

impl RegionHeatConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false))
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("REGIONHEAT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let regionheat_config: RegionHeatConfig = config.try_deserialize()?;
        Ok(regionheat_config)
    }

    /// Resolve the figure section into typed render parameters.
    pub fn figure_params(&self) -> Result<FigureParams> {
        let connectivity = Connectivity::from_neighbours(self.overlay.connectivity)
            .ok_or_else(|| {
                anyhow!(
                    "overlay.connectivity must be 4 or 8, got {}",
                    self.overlay.connectivity
                )
            })?;
        let overlay = OverlayStyle::new(
            parse_hex_color(&self.overlay.line_color)?,
            self.overlay.alpha,
            self.overlay.transparent_unmarked,
        )?;

        Ok(FigureParams {
            layout: FigureLayout::new(self.figure.rows, self.figure.cols),
            scale: self.figure.scale,
            colormap: Colormap::from_name(&self.figure.colormap)?,
            round_to: self.figure.round_to,
            flip_x: self.figure.flip_x,
            flip_y: self.figure.flip_y,
            hide_axes: self.figure.hide_axes,
            background: parse_hex_color(&self.figure.background)?,
            colorbar_width: self.figure.colorbar_width,
            connectivity,
            overlay,
        })
    }

    pub fn frame_settings(&self) -> FrameSettings {
        FrameSettings {
            prefix: self.output.frame_prefix.clone(),
            digits: self.output.frame_digits,
            even_dimensions: self.output.even_dimensions,
        }
    }
}
