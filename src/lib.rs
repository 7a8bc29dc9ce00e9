//! regionheat - Region metric heatmaps over brain annotation volumes.
//!
//! Maps a per-region metric (cell density, mean intensity) onto every pixel
//! of a labelled slice, overlays region boundaries as a translucent mask,
//! and lays the panels out into figures or numbered animation frames.

pub mod boundary;
pub mod colormap;
pub mod config;
pub mod error;
pub mod figure;
pub mod frames;
pub mod lookup;
pub mod metrics;
pub mod style;
pub mod summary;
pub mod volume;

pub use boundary::{BoundaryMask, Connectivity};
pub use colormap::Colormap;
pub use config::RegionHeatConfig;
pub use error::{RenderError, Result};
pub use figure::{render_figure, FigureLayout, FigureParams};
pub use frames::{export_frames, save_png, FrameSettings};
pub use lookup::LookupArray;
pub use metrics::{DisplayBound, MetricTable};
pub use style::OverlayStyle;
pub use summary::Summary;
pub use volume::LabelVolume;
