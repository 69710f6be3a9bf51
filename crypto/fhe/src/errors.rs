//! FHE seam error types

use thiserror::Error;

/// Errors that can occur at the co-processor boundary
#[derive(Error, Debug)]
pub enum FheError {
    /// Encryption proof did not verify against the submitted bytes
    #[error("Invalid encryption proof")]
    InvalidProof,

    /// Submitted plaintext bytes have the wrong shape
    #[error("Invalid plaintext encoding: expected {expected} bytes, got {got}")]
    InvalidPlaintext { expected: usize, got: usize },

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}
