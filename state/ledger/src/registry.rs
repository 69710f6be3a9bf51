//! Eligibility registry
//!
//! A submission is accepted only from a principal holding at least one
//! eligible asset. Minting and ownership bookkeeping live elsewhere; the
//! ledger consults this as a boolean gate, on every call.

use cipherboard_fhe::{AssetId, Principal};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Membership gate consulted by the ledger before accepting a submission
pub trait EligibilityProvider: Send + Sync {
    /// Whether the principal holds at least one eligible asset
    fn is_eligible(&self, principal: &Principal) -> bool;

    /// First eligible asset held by the principal, if any
    fn first_eligible_asset(&self, principal: &Principal) -> Option<AssetId>;
}

/// In-memory asset registry
///
/// Shared behind `Arc`; registration goes through interior mutability so the
/// ledger's view updates without reconstructing anything.
#[derive(Default)]
pub struct InMemoryEligibility {
    assets: RwLock<HashMap<Principal, Vec<AssetId>>>,
}

impl InMemoryEligibility {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an asset for a principal
    pub fn register(&self, principal: Principal, asset: AssetId) {
        let mut assets = self.assets.write();
        let held = assets.entry(principal).or_default();
        if !held.contains(&asset) {
            held.push(asset);
        }
    }

    /// Remove all assets held by a principal
    pub fn revoke_all(&self, principal: &Principal) {
        self.assets.write().remove(principal);
    }

    /// Number of principals with at least one asset
    pub fn member_count(&self) -> usize {
        self.assets.read().len()
    }
}

impl EligibilityProvider for InMemoryEligibility {
    fn is_eligible(&self, principal: &Principal) -> bool {
        self.assets
            .read()
            .get(principal)
            .map(|held| !held.is_empty())
            .unwrap_or(false)
    }

    fn first_eligible_asset(&self, principal: &Principal) -> Option<AssetId> {
        self.assets
            .read()
            .get(principal)
            .and_then(|held| held.first().copied())
    }
}
