//! Deterministic in-process co-processor
//!
//! Stands in for the remote FHE service behind the same seam. Handles are
//! derived from an instance nonce and an insertion counter, so two instances
//! never collide and a handle is never reused within one instance. The
//! plaintext store is only reachable through `reveal`, which sits behind the
//! oracle's access-control check in every integration.

use crate::errors::FheError;
use crate::handle::{Ciphertext, EncryptedBool, EncryptionProof};
use crate::{Coprocessor, FheConfig};
use parking_lot::RwLock;
use std::collections::HashMap;

struct Store {
    values: HashMap<[u8; 32], u32>,
    bools: HashMap<[u8; 32], bool>,
    counter: u64,
}

/// In-process co-processor with a handle -> plaintext store
pub struct LocalCoprocessor {
    nonce: [u8; 32],
    store: RwLock<Store>,
}

impl LocalCoprocessor {
    /// Create a co-processor instance
    pub fn new(config: FheConfig) -> Self {
        Self {
            nonce: config.instance_nonce,
            store: RwLock::new(Store {
                values: HashMap::new(),
                bools: HashMap::new(),
                counter: 0,
            }),
        }
    }

    /// Trusted-path decryption of a value handle.
    ///
    /// The co-processor itself can always decrypt; access control is enforced
    /// at the oracle boundary, not here. Unknown handles and the zero
    /// sentinel decrypt to 0.
    pub fn reveal(&self, handle: Ciphertext) -> u32 {
        self.store
            .read()
            .values
            .get(handle.as_bytes())
            .copied()
            .unwrap_or(0)
    }

    /// Number of value handles currently held
    pub fn handle_count(&self) -> usize {
        self.store.read().values.len()
    }

    fn next_handle(&self, store: &mut Store, tag: &[u8]) -> [u8; 32] {
        store.counter += 1;
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"cipherboard_handle");
        hasher.update(tag);
        hasher.update(&self.nonce);
        hasher.update(&store.counter.to_le_bytes());
        *hasher.finalize().as_bytes()
    }

    fn insert_value(&self, value: u32) -> Ciphertext {
        let mut store = self.store.write();
        let handle = self.next_handle(&mut store, b"uint32");
        store.values.insert(handle, value);
        Ciphertext::from_bytes(handle)
    }

    fn value_of(&self, handle: Ciphertext) -> u32 {
        self.store
            .read()
            .values
            .get(handle.as_bytes())
            .copied()
            .unwrap_or(0)
    }
}

impl Coprocessor for LocalCoprocessor {
    fn encrypt_external(
        &self,
        raw: &[u8],
        proof: &EncryptionProof,
    ) -> Result<Ciphertext, FheError> {
        if !proof.verify(raw) {
            return Err(FheError::InvalidProof);
        }
        let bytes: [u8; 4] = raw.try_into().map_err(|_| FheError::InvalidPlaintext {
            expected: 4,
            got: raw.len(),
        })?;
        let value = u32::from_le_bytes(bytes);
        let handle = self.insert_value(value);
        tracing::trace!(handle = %handle.to_hex(), "ingested external ciphertext");
        Ok(handle)
    }

    fn greater_than(&self, a: Ciphertext, b: Ciphertext) -> EncryptedBool {
        let result = self.value_of(a) > self.value_of(b);
        let mut store = self.store.write();
        let handle = self.next_handle(&mut store, b"bool");
        store.bools.insert(handle, result);
        EncryptedBool::from_bytes(handle)
    }

    fn select(&self, cond: EncryptedBool, a: Ciphertext, b: Ciphertext) -> Ciphertext {
        let taken = {
            let store = self.store.read();
            store.bools.get(cond.as_bytes()).copied().unwrap_or(false)
        };
        let value = if taken {
            self.value_of(a)
        } else {
            self.value_of(b)
        };
        self.insert_value(value)
    }
}
