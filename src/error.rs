//! Error types with actionable diagnostics.
//!
//! All errors carry the context needed to resolve the problem (offending
//! path, asymmetric key lists, mismatched shapes) without consulting
//! external documentation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for mezclar operations.
pub type Result<T> = std::result::Result<T, MezclarError>;

/// Errors that can occur while blending or merging adapters.
#[derive(Error, Debug)]
pub enum MezclarError {
    /// A required adapter file is absent.
    #[error("Adapter file not found: {path}\n  → Expected a PEFT adapter directory with adapter_model.safetensors and adapter_config.json")]
    AdapterFileNotFound { path: PathBuf },

    /// The base model checkpoint is absent.
    #[error("Base model checkpoint not found: {path}\n  → Expected a directory containing a single-file model.safetensors checkpoint")]
    ModelNotFound { path: PathBuf },

    /// Two weight sets being blended do not cover the same parameter names.
    #[error("Adapter tensors mismatch. Missing in A: {missing_in_a:?}, missing in B: {missing_in_b:?}")]
    KeyMismatch { missing_in_a: Vec<String>, missing_in_b: Vec<String> },

    /// Tensor shape disagrees with what the operation requires.
    #[error("Tensor shape mismatch for '{name}': expected {expected:?}, got {actual:?}")]
    ShapeMismatch { name: String, expected: Vec<usize>, actual: Vec<usize> },

    /// A tensor uses a dtype the combiner cannot operate on.
    #[error("Unsupported dtype {dtype} for tensor '{name}'\n  → Supported dtypes: F32, F16, BF16")]
    UnsupportedDtype { name: String, dtype: String },

    /// Adapter contents are inconsistent (e.g. an unpaired LoRA matrix).
    #[error("Adapter validation error: {message}")]
    Validation { message: String },

    /// SafeTensors encode/decode failure.
    #[error("SafeTensors error: {message}")]
    SafeTensors { message: String },

    /// JSON serialization/deserialization failure.
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// IO error with context.
    #[error("IO error: {context}\n  Cause: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl MezclarError {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into() }
    }
}
