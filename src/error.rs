//! Error types for map generation, rendering and persistence.

/// Errors produced by the map core and its file-backed collaborators.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// A coordinate query fell outside the generated raster.
    #[error("coordinate ({x}, {y}) is outside the {width}x{height} map")]
    OutOfBounds {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },

    /// The requested raster has a zero dimension.
    #[error("invalid map dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    /// No record with this name exists in the seed list.
    #[error("no seed named {0:?} in the seed list")]
    UnknownSeed(String),

    /// Failed to read or write a file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse or serialize JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to encode an image.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, MapError>;
