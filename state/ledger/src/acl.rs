//! Access control over ciphertext handles
//!
//! A grant `(ciphertext, principal)` permits the principal to request
//! plaintext disclosure of that handle through the decryption oracle. Grants
//! are append-only within a handle's lifetime: handles are never reused, so
//! grants on a superseded generation are harmless and never revoked.

use cipherboard_fhe::{Ciphertext, Principal};
use std::collections::{HashMap, HashSet};

/// Grant set consulted by the external decryption oracle
#[derive(Clone, Debug, Default)]
pub struct AccessControl {
    grants: HashMap<Ciphertext, HashSet<Principal>>,
}

impl AccessControl {
    /// Create an empty grant set
    pub fn new() -> Self {
        Self::default()
    }

    /// Permit `principal` to request disclosure of `ciphertext`. Idempotent.
    pub fn grant(&mut self, ciphertext: Ciphertext, principal: Principal) {
        let inserted = self.grants.entry(ciphertext).or_default().insert(principal);
        if inserted {
            tracing::debug!(
                handle = %ciphertext.to_hex(),
                principal = %principal,
                "access granted"
            );
        }
    }

    /// Membership test, consulted by the oracle
    pub fn is_granted(&self, ciphertext: &Ciphertext, principal: &Principal) -> bool {
        self.grants
            .get(ciphertext)
            .map(|set| set.contains(principal))
            .unwrap_or(false)
    }

    /// Number of principals granted on a handle
    pub fn grant_count(&self, ciphertext: &Ciphertext) -> usize {
        self.grants.get(ciphertext).map(|set| set.len()).unwrap_or(0)
    }

    /// Number of handles carrying at least one grant
    pub fn handle_count(&self) -> usize {
        self.grants.len()
    }
}
