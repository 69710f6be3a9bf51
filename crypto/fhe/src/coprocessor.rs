//! The co-processor seam
//!
//! Three primitives, treated as a black box. Comparison and selection are
//! pure and total: they always yield a fresh handle and never observe or
//! reveal a plaintext. Decryption is *not* part of this seam; it happens
//! through the signature-gated oracle on the client side.

use crate::errors::FheError;
use crate::handle::{Ciphertext, EncryptedBool, EncryptionProof};

/// Homomorphic primitives exposed by the FHE co-processor
pub trait Coprocessor: Send + Sync {
    /// Ingest externally encrypted bytes, gated by an encryption proof.
    ///
    /// Fails with `FheError::InvalidProof` when the proof does not verify
    /// against the bytes.
    fn encrypt_external(
        &self,
        raw: &[u8],
        proof: &EncryptionProof,
    ) -> Result<Ciphertext, FheError>;

    /// Encrypted `a > b`. Total: a handle the co-processor has never seen
    /// (including the zero sentinel) behaves as an encryption of 0.
    fn greater_than(&self, a: Ciphertext, b: Ciphertext) -> EncryptedBool;

    /// Encrypted branch: the value of `a` where `cond` holds, else of `b`.
    /// Always yields a fresh handle; handles are never reused.
    fn select(&self, cond: EncryptedBool, a: Ciphertext, b: Ciphertext) -> Ciphertext;
}
