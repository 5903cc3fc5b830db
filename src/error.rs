use thiserror::Error;

/// Errors that can occur while producing the flattened study image
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("the background photo is enabled but no image has been loaded")]
    MissingBackground,

    #[error("invalid export size: {0}")]
    InvalidSize(u32),

    #[error("failed to allocate a {0}x{0} overlay")]
    OverlayAllocation(u32),

    #[error("failed to encode the exported image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("the export worker stopped before finishing")]
    WorkerGone,
}

/// Errors that can occur while reading an uploaded image
#[derive(Debug, Error)]
pub enum ImageLoadError {
    #[error("no image data")]
    Empty,

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Errors that can occur while loading the editor configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}
