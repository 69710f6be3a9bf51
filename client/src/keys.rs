//! Ephemeral session keys
//!
//! Each authorization session carries a fresh Kyber keypair. The oracle
//! encrypts disclosed plaintexts to the public key; the private key never
//! leaves the client and is wiped from memory on drop.

use pqcrypto_kyber::kyber1024;
use pqcrypto_traits::kem::{PublicKey as _, SecretKey as _};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Secret key material, zeroized on drop
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct SecretBytes(Vec<u8>);

impl SecretBytes {
    /// Wrap raw secret bytes
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Access the raw bytes
    pub fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SecretBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretBytes")
            .field("len", &self.0.len())
            .finish()
    }
}

/// Fresh keypair generated per authorization session
pub struct EphemeralKeypair {
    public_key: Vec<u8>,
    secret_key: SecretBytes,
}

impl EphemeralKeypair {
    /// Generate a new Kyber-1024 keypair
    pub fn generate() -> Self {
        let (pk, sk) = kyber1024::keypair();
        Self {
            public_key: pk.as_bytes().to_vec(),
            secret_key: SecretBytes::new(sk.as_bytes().to_vec()),
        }
    }

    /// Public half, shared with the oracle
    pub fn public_key(&self) -> &[u8] {
        &self.public_key
    }

    /// Secret half, kept client-side
    pub fn secret_key(&self) -> &SecretBytes {
        &self.secret_key
    }

    /// Split into owned halves
    pub fn into_parts(self) -> (Vec<u8>, SecretBytes) {
        (self.public_key, self.secret_key)
    }
}
