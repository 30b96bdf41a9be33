//! # Error Types
//!
//! This module defines error types used throughout the vitrina library.

use thiserror::Error;

/// Main error type for vitrina operations.
///
/// The rendering core is deliberately forgiving: bad numeric inputs are
/// normalized, missing data fields are omitted from the layout, and luminance
/// sampling falls back to a neutral constant. Only structural problems (no
/// source image for a photo template) and encoding failures surface as errors.
#[derive(Debug, Error)]
pub enum VitrinaError {
    /// A template that needs a source photo was invoked without one
    #[error("No source image for template '{0}'")]
    MissingImage(&'static str),

    /// Story composition error (bad block id, unusable session state)
    #[error("Story error: {0}")]
    Story(String),

    /// Image processing error
    #[error("Image error: {0}")]
    Image(String),

    /// Encoding the rendered surface to jpg/png failed
    #[error("Encode error: {0}")]
    Encode(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
