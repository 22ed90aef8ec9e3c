use thiserror::Error;

/// Errors that can occur while loading the source bitmaps
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Failed to read image file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Errors that can occur while flattening the composite
#[derive(Debug, Error)]
pub enum ExportError {
    /// Nothing has been rendered yet, so there is nothing to export
    #[error("No rendered snapshot available")]
    NoSnapshot,

    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
}

/// Errors reported by the local image store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to write image: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Invalid file name: {0:?}")]
    InvalidFileName(String),
}

/// Errors that can occur while loading the editor configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ImageResult<T> = Result<T, ImageError>;
pub type ExportResult<T> = Result<T, ExportError>;
pub type StoreResult<T> = Result<T, StoreError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
