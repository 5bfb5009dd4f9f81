use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DatasetError>;

#[derive(Error, Debug)]
pub enum DatasetError {
    // IO and decoding
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Cannot infer image format from url: {0}")]
    UnknownImageFormat(String),

    // Dataset layout
    #[error("Unknown domain: {0}")]
    UnknownDomain(String),

    #[error("Image name {name:?} does not match the {domain} naming pattern")]
    NameMismatch { domain: String, name: String },

    #[error("Sample count mismatch. Images: {images}, labels: {labels}")]
    LengthMismatch { images: usize, labels: usize },

    // MAT files
    #[error("Variable {name:?} not found in {}", .path.display())]
    MissingVariable { path: PathBuf, name: String },

    #[error("Malformed MAT file: {0}")]
    MatFormat(String),

    // Post-processing
    #[error("Shape error: {0}")]
    ShapeError(#[from] ndarray::ShapeError),

    #[error("Transform error: {0}")]
    TransformError(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}
