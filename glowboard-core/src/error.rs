//! Error types for panel documents.
//!
//! Layout mutations never fail with these; they resolve locally into a
//! [`Rejection`](crate::Rejection). Only loading and saving documents can.

use thiserror::Error;

/// Result type for panel operations.
pub type PanelResult<T> = Result<T, PanelError>;

/// Errors that can occur while building panels or reading documents.
#[derive(Debug, Error)]
pub enum PanelError {
    /// Panel dimensions are not positive finite numbers.
    #[error("Invalid panel dimensions: {width}x{height}")]
    InvalidPanel {
        /// Requested width.
        width: f32,
        /// Requested height.
        height: f32,
    },

    /// An element id in a document is not a valid identifier.
    #[error("Invalid element id: {0}")]
    InvalidElementId(String),

    /// Document serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
