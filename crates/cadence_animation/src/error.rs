//! Animation error types
//!
//! Playback itself never fails. These cover the authoring surfaces: curves
//! and configuration.

use thiserror::Error;

/// Errors raised while building animation data
#[derive(Error, Debug)]
pub enum AnimationError {
    /// Curve keys were empty or not finite
    #[error("invalid easing curve: {0}")]
    InvalidCurve(String),

    /// Configuration text could not be parsed
    #[error("invalid animator config: {0}")]
    Config(#[from] toml::de::Error),
}

/// Result type for animation authoring operations
pub type Result<T> = std::result::Result<T, AnimationError>;
