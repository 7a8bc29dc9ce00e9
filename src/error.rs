//! Error types for regionheat rendering.

use std::path::PathBuf;

/// Result type alias using RenderError
pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors raised while loading inputs or rendering figures
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Filesystem error, with the path that failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Label volume could not be decoded
    #[error("TIFF error in {path}: {source}")]
    Tiff {
        path: PathBuf,
        #[source]
        source: tiff::TiffError,
    },

    /// Metric table could not be parsed
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// PNG encoding failed
    #[error("Image error on {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Label volume content is not a valid region id array
    #[error("Invalid label volume: {0}")]
    InvalidVolume(String),

    /// Metric table content is malformed
    #[error("Invalid metric table: {0}")]
    InvalidTable(String),

    /// Requested metric column does not exist in the table header
    #[error("Metric column '{column}' not found (available: {available})")]
    UnknownColumn { column: String, available: String },

    /// A slice holds a label the lookup array has no entry for
    #[error("Label {label} is out of range for a lookup array of length {len}")]
    LabelOutOfRange { label: u32, len: usize },

    /// Lookup array was built from a different volume or table
    #[error("Stale lookup array: built for a different {0}, rebuild it before rendering")]
    StaleLookup(&'static str),

    /// Grid layout has fewer cells than requested slices
    #[error("Figure layout {rows}x{cols} has {} cells but {requested} slices were requested", .rows * .cols)]
    LayoutInsufficient {
        requested: usize,
        rows: usize,
        cols: usize,
    },

    /// No slices were requested
    #[error("No slices requested")]
    EmptySelection,

    /// Requested z-index is past the end of the volume
    #[error("Slice index {index} out of range for volume depth {depth}")]
    SliceOutOfRange { index: usize, depth: usize },

    /// Unknown colormap name
    #[error("Unknown colormap '{name}'. Supported: {supported}")]
    UnknownColormap { name: String, supported: String },

    /// A numeric or styling parameter is invalid
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl RenderError {
    /// True for errors caused by the request shape rather than the input files
    pub fn is_request_error(&self) -> bool {
        matches!(
            self,
            RenderError::LayoutInsufficient { .. }
                | RenderError::EmptySelection
                | RenderError::SliceOutOfRange { .. }
                | RenderError::InvalidParameter(_)
        )
    }
}
