//! Error types for the blueprint decoder.

use thiserror::Error;

/// Result type alias using DecodeError.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Main error type for blueprint decoding operations.
///
/// Per-file errors (`Format`, `EmptyVolume`, `NoSolidVoxels`, `NameFormat`)
/// are fatal for the offending file only; the style
/// processing boundary catches them, logs the path, and moves on.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Packed block stream length does not match the declared dimensions.
    #[error("block stream length mismatch: {0}")]
    Format(String),

    /// The block volume has a zero dimension, so no bounding box exists.
    #[error("block volume is empty")]
    EmptyVolume,

    /// No solid voxel found; the building has no physical material.
    #[error("no solid voxels in volume")]
    NoSolidVoxels,

    /// File name does not match the `<name><level?>.blueprint` pattern.
    #[error("file name doesn't match the blueprint pattern: {0}")]
    NameFormat(String),

    /// Failed to parse the NBT container.
    #[error("NBT parse error: {0}")]
    Nbt(#[from] fastnbt::error::Error),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse or write JSON data.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to read or process an image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Failed to encode a perceptual hash.
    #[error("blurhash error: {0}")]
    BlurHash(String),
}
