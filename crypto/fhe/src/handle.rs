//! Leaf identity and handle types
//!
//! Everything the ledger and client share is defined here: principals,
//! contract scopes, network identity, and the opaque handles referencing
//! values held by the co-processor. A handle carries no information about
//! its plaintext; only handle identity is comparable locally.

use serde::{Deserialize, Serialize};

/// A unique participant identity (account address equivalent)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Principal([u8; 32]);

impl Principal {
    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Derive a principal from a human-readable label
    pub fn derive(label: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"cipherboard_principal");
        hasher.update(label.as_bytes());
        Self(*hasher.finalize().as_bytes())
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

/// A contract scope a decryption session may be bound to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContractRef([u8; 32]);

impl ContractRef {
    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Derive a contract reference from a human-readable label
    pub fn derive(label: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"cipherboard_contract");
        hasher.update(label.as_bytes());
        Self(*hasher.finalize().as_bytes())
    }
}

/// Chain identity, compared by the staleness guard
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetworkId(pub u64);

/// Identifier of an eligibility asset
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetId(pub u64);

/// Milliseconds since the Unix epoch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Current wall-clock time
    pub fn now() -> Self {
        let millis = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        Self(millis)
    }

    /// Milliseconds since epoch
    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Timestamp shifted forward by whole days
    pub fn plus_days(&self, days: u64) -> Self {
        Self(self.0.saturating_add(days * 24 * 60 * 60 * 1000))
    }
}

/// Opaque reference to an encrypted 32-bit score held by the co-processor
///
/// The all-zero handle is a sentinel meaning "never submitted"; it decrypts
/// to plaintext 0 without any oracle involvement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ciphertext([u8; 32]);

impl Ciphertext {
    /// The all-zero sentinel handle
    pub const ZERO: Ciphertext = Ciphertext([0u8; 32]);

    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Whether this is the "never submitted" sentinel
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

/// Opaque reference to an encrypted comparison result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncryptedBool([u8; 32]);

impl EncryptedBool {
    /// Create from raw bytes
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

/// Commitment accompanying externally encrypted bytes
///
/// The co-processor refuses ciphertext bytes whose proof does not verify.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionProof {
    commitment: [u8; 32],
}

impl EncryptionProof {
    /// Produce a proof for the given ciphertext bytes
    pub fn prove(raw: &[u8]) -> Self {
        Self {
            commitment: Self::commit(raw),
        }
    }

    /// Check the proof against ciphertext bytes
    pub fn verify(&self, raw: &[u8]) -> bool {
        self.commitment == Self::commit(raw)
    }

    fn commit(raw: &[u8]) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"cipherboard_encrypt_proof");
        hasher.update(raw);
        *hasher.finalize().as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_derivation_is_deterministic() {
        assert_eq!(Principal::derive("alice"), Principal::derive("alice"));
        assert_ne!(Principal::derive("alice"), Principal::derive("bob"));
    }

    #[test]
    fn test_zero_sentinel() {
        assert!(Ciphertext::ZERO.is_zero());
        assert!(!Ciphertext::from_bytes([1u8; 32]).is_zero());
    }

    #[test]
    fn test_proof_round_trip() {
        let raw = 42u32.to_le_bytes();
        let proof = EncryptionProof::prove(&raw);
        assert!(proof.verify(&raw));
        assert!(!proof.verify(&43u32.to_le_bytes()));
    }

    #[test]
    fn test_timestamp_plus_days() {
        let t = Timestamp(1_000);
        assert_eq!(t.plus_days(1).as_millis(), 1_000 + 86_400_000);
    }

    #[test]
    fn test_handle_serialization() {
        let ct = Ciphertext::from_bytes([7u8; 32]);
        let bytes = bincode::serialize(&ct).unwrap();
        let restored: Ciphertext = bincode::deserialize(&bytes).unwrap();
        assert_eq!(ct, restored);
    }
}
