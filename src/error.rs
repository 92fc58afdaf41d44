//! Error types for the block icon renderer.

use thiserror::Error;

/// Result type alias using RenderError.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Main error type for loading assets and rendering icons.
///
/// None of these are recoverable inside a render call: they describe
/// malformed or missing asset data that has to be fixed at the source.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Failed to read or parse a ZIP archive.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Failed to parse JSON data.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to read, decode or encode an image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Texture pixel data that does not match its dimensions.
    #[error("Invalid texture: {0}")]
    InvalidTexture(String),

    /// Resource not found in the resource pack.
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// Invalid resource pack structure.
    #[error("Invalid resource pack: {0}")]
    InvalidResourcePack(String),

    /// Model inheritance chain too deep (circular reference protection).
    #[error("Model inheritance too deep (possible circular reference): {0}")]
    ModelInheritanceTooDeep(String),

    /// Neither the model nor any of its parents declares elements.
    #[error("Malformed geometry: {0}")]
    MalformedGeometry(String),

    /// A `#ref` texture reference could not be resolved through the parent chain.
    #[error("Unresolved texture reference: {0}")]
    UnresolvedTextureReference(String),

    /// UV inference was needed but the face is not parallel to any axis plane.
    #[error("Invalid UV lock geometry: {0}")]
    InvalidUvLockGeometry(String),

    /// A face or model rotation is not one of 0, 90, 180, 270.
    #[error("Invalid rotation: {0}")]
    InvalidFaceRotation(String),

    /// Malformed blockstate definition or condition.
    #[error("Invalid blockstate: {0}")]
    InvalidStateSpec(String),
}
