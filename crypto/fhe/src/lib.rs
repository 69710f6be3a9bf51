//! CIPHERBOARD FHE Co-processor Seam
//!
//! The score ledger never sees a plaintext score. Every score lives in the
//! external FHE co-processor and is referenced locally through an opaque
//! 32-byte handle. This crate owns the handle algebra and the black-box
//! interface to the co-processor.
//!
//! # Key Features:
//! - Opaque `Ciphertext` / `EncryptedBool` handles, locally comparable by
//!   identity only
//! - Proof-gated ingestion of externally encrypted values
//! - Homomorphic `greater_than` / `select` primitives (pure, total)
//! - A deterministic in-process co-processor for tests and local mode
//!
//! # Architecture:
//! - `Coprocessor`: the seam every consumer programs against
//! - `LocalCoprocessor`: handle -> plaintext store behind the same seam;
//!   what a real deployment replaces with the remote service

pub mod coprocessor;
pub mod errors;
pub mod handle;
pub mod local;

pub use coprocessor::Coprocessor;
pub use errors::FheError;
pub use handle::{
    AssetId, Ciphertext, ContractRef, EncryptedBool, EncryptionProof, NetworkId, Principal,
    Timestamp,
};
pub use local::LocalCoprocessor;

/// Plaintext width of an encrypted score, in bits.
pub const SCORE_BITS: u32 = 32;

/// FHE seam configuration
#[derive(Clone, Debug)]
pub struct FheConfig {
    /// Instance nonce mixed into every derived handle
    pub instance_nonce: [u8; 32],
    /// Security parameter of the backing scheme (bits)
    pub security_bits: u32,
}

impl Default for FheConfig {
    fn default() -> Self {
        Self {
            instance_nonce: [0u8; 32],
            security_bits: 128,
        }
    }
}

impl FheConfig {
    /// Configuration with a random instance nonce
    pub fn random() -> Self {
        use rand::RngCore;
        let mut nonce = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut nonce);
        Self {
            instance_nonce: nonce,
            ..Self::default()
        }
    }
}

/// Result type for FHE seam operations
pub type FheResult<T> = Result<T, FheError>;
