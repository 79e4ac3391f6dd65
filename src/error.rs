// In: src/error.rs

//! This module defines the single, unified error type for the entire chronocol library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.
//!
//! Note that "try the other operand ordering" is *not* an error. Dispatch code
//! returns [`crate::arith::Dispatch::NotImplemented`] for that case.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ChronocolError>;

#[derive(Error, Debug)]
pub enum ChronocolError {
    // =========================================================================
    // === High-Level, Semantic Errors (Specific to our library's logic)
    // =========================================================================
    /// Dtype or timezone incompatibility between operands.
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// A positional index outside `[-len, len)`.
    #[error("index {index} is out of bounds for axis 0 with size {len}")]
    IndexOutOfBounds { index: i64, len: usize },

    /// Malformed input: lengths, shapes, units, or mixed dtypes on concat.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Unknown or unsupported timezone: {0}")]
    InvalidTimezone(String),

    #[error("Could not parse instant: {0}")]
    Parse(String),

    #[error("Ambiguous wall time: {0}")]
    AmbiguousTime(String),

    #[error("Nonexistent wall time: {0}")]
    NonexistentTime(String),

    #[error("Overflow in int64 arithmetic: {0}")]
    Overflow(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Internal logic error (this is a bug): {0}")]
    InternalError(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the Arrow library.
    #[error("Arrow operation failed: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// An error from the Serde JSON library, typically while loading a config.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from a safe byte-casting operation failing.
    #[error("Byte slice casting error: {0}")]
    PodCast(String), // bytemuck::PodCastError doesn't impl Error
}

// =============================================================================
// === Manual `From` Implementations ===
// =============================================================================

impl From<bytemuck::PodCastError> for ChronocolError {
    fn from(err: bytemuck::PodCastError) -> Self {
        ChronocolError::PodCast(err.to_string())
    }
}

impl ChronocolError {
    pub(crate) fn overflow(context: impl Into<String>) -> Self {
        ChronocolError::Overflow(context.into())
    }
}
