//! Decryption authorization sessions
//!
//! A session is a client-held capability binding a signing identity, a
//! network, a set of contract scopes, a time window, and an ephemeral
//! keypair, sealed by a user-provided signature over a typed message.
//!
//! Binding is structural: the cache key is built from identity + canonical
//! scope, so a session can never be looked up under a different identity or
//! scope set. Expiry is passive; there is no background timer. Every
//! consumer checks the window at time of use and re-runs the ceremony on an
//! elapsed session.

use crate::keys::{EphemeralKeypair, SecretBytes};
use crate::store::SessionStore;
use crate::SessionResult;
use async_trait::async_trait;
use cipherboard_fhe::{ContractRef, NetworkId, Principal, Timestamp};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Policy duration of a session, in whole days
pub const SESSION_DURATION_DAYS: u64 = 7;

/// Lifecycle of an authorization session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No session exists for the key
    Absent,
    /// Ceremony in progress, awaiting the user's signature
    Pending,
    /// Signed and inside its validity window
    Valid,
    /// Validity window elapsed
    Expired,
}

/// Typed message placed before the signer during the ceremony
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthorizationMessage {
    /// Contract scopes the capability covers
    pub scoped_contracts: Vec<ContractRef>,
    /// Ephemeral public key the oracle will encrypt responses to
    pub public_key: Vec<u8>,
    /// Window start
    pub start_time: Timestamp,
    /// Window length in whole days
    pub duration_days: u64,
}

impl AuthorizationMessage {
    /// Canonical digest of the message, the bytes actually signed
    pub fn digest(&self) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"cipherboard_authorization");
        hasher.update(&(self.scoped_contracts.len() as u64).to_le_bytes());
        for contract in &self.scoped_contracts {
            hasher.update(contract.as_bytes());
        }
        hasher.update(&(self.public_key.len() as u64).to_le_bytes());
        hasher.update(&self.public_key);
        hasher.update(&self.start_time.as_millis().to_le_bytes());
        hasher.update(&self.duration_days.to_le_bytes());
        *hasher.finalize().as_bytes()
    }
}

/// A signed, cached decryption capability
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthorizationSession {
    /// Identity whose signature sealed the session
    pub signing_identity: Principal,
    /// Network the session was created on
    pub network: NetworkId,
    /// Canonical (sorted, deduplicated) contract scopes
    pub scoped_contracts: Vec<ContractRef>,
    /// Ephemeral public key
    pub public_key: Vec<u8>,
    /// Ephemeral private key, held only by the creating client
    pub private_key: SecretBytes,
    /// Signature over the authorization message digest
    pub signature: Vec<u8>,
    /// Window start
    pub start_time: Timestamp,
    /// Window length in whole days
    pub duration_days: u64,
}

impl AuthorizationSession {
    /// End of the validity window
    pub fn expires_at(&self) -> Timestamp {
        self.start_time.plus_days(self.duration_days)
    }

    /// Whether the window covers `now`
    pub fn is_valid_at(&self, now: Timestamp) -> bool {
        now < self.expires_at()
    }

    /// Classify the session at `now`
    pub fn state_at(&self, now: Timestamp) -> SessionState {
        if self.is_valid_at(now) {
            SessionState::Valid
        } else {
            SessionState::Expired
        }
    }

    /// Whether the session's scope covers a contract
    pub fn scope_contains(&self, contract: &ContractRef) -> bool {
        self.scoped_contracts.binary_search(contract).is_ok()
    }
}

/// Cache key: identity plus canonical scope digest
///
/// Structural binding lives here. Two different identities, or two
/// different scope sets, can never collide on a key, so a session cannot be
/// reused across either.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    identity: Principal,
    scope_digest: [u8; 32],
}

impl SessionKey {
    /// Build the key for an identity and scope set
    pub fn new(identity: Principal, contracts: &[ContractRef]) -> Self {
        let canonical = canonical_scope(contracts);
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"cipherboard_session_scope");
        for contract in &canonical {
            hasher.update(contract.as_bytes());
        }
        Self {
            identity,
            scope_digest: *hasher.finalize().as_bytes(),
        }
    }

    /// Identity half of the key
    pub fn identity(&self) -> Principal {
        self.identity
    }

    /// Stable hex form, usable as a file name
    pub fn to_hex(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"cipherboard_session_key");
        hasher.update(self.identity.as_bytes());
        hasher.update(&self.scope_digest);
        hex::encode(hasher.finalize().as_bytes())
    }
}

/// Sort and deduplicate a scope set into its canonical form
pub fn canonical_scope(contracts: &[ContractRef]) -> Vec<ContractRef> {
    let mut canonical = contracts.to_vec();
    canonical.sort();
    canonical.dedup();
    canonical
}

/// External, user-mediated signature ceremony
///
/// The user may decline; that surfaces as `SessionError::SignatureDenied`
/// and is retryable by re-invoking `load_or_create`.
#[async_trait]
pub trait SessionSigner: Send + Sync {
    /// Request a signature over the authorization message
    async fn sign_authorization(
        &self,
        identity: Principal,
        message: &AuthorizationMessage,
    ) -> SessionResult<Vec<u8>>;
}

/// Creates, caches, and re-validates authorization sessions
pub struct SessionManager {
    signer: Arc<dyn SessionSigner>,
    store: Arc<dyn SessionStore>,
    duration_days: u64,
}

impl SessionManager {
    /// Create a manager with the policy duration
    pub fn new(signer: Arc<dyn SessionSigner>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            signer,
            store,
            duration_days: SESSION_DURATION_DAYS,
        }
    }

    /// Override the session duration (policy knob, not per-call)
    pub fn with_duration_days(mut self, days: u64) -> Self {
        self.duration_days = days;
        self
    }

    /// Cached-or-fresh session for the identity and scope, stamped now
    pub async fn load_or_create(
        &self,
        identity: Principal,
        network: NetworkId,
        contracts: &[ContractRef],
    ) -> SessionResult<AuthorizationSession> {
        self.load_or_create_at(identity, network, contracts, Timestamp::now())
            .await
    }

    /// Cached-or-fresh session with an explicit clock reading
    ///
    /// A cached session is returned only when it is unexpired *and* bound to
    /// the requested network; otherwise the ceremony runs again and the
    /// fresh session replaces the cached one. A denied signature leaves the
    /// cache untouched.
    pub async fn load_or_create_at(
        &self,
        identity: Principal,
        network: NetworkId,
        contracts: &[ContractRef],
        now: Timestamp,
    ) -> SessionResult<AuthorizationSession> {
        let canonical = canonical_scope(contracts);
        let key = SessionKey::new(identity, &canonical);

        if let Some(cached) = self.store.load(&key)? {
            if cached.network == network && cached.is_valid_at(now) {
                tracing::debug!(key = %key.to_hex(), "reusing cached session");
                return Ok(cached);
            }
            tracing::debug!(
                key = %key.to_hex(),
                state = ?cached.state_at(now),
                "cached session unusable, re-running ceremony"
            );
        }

        // Pending: generate the keypair, put the typed message before the
        // signer, persist only on approval.
        let keypair = EphemeralKeypair::generate();
        let message = AuthorizationMessage {
            scoped_contracts: canonical.clone(),
            public_key: keypair.public_key().to_vec(),
            start_time: now,
            duration_days: self.duration_days,
        };

        let signature = self.signer.sign_authorization(identity, &message).await?;
        let (public_key, private_key) = keypair.into_parts();

        let session = AuthorizationSession {
            signing_identity: identity,
            network,
            scoped_contracts: canonical,
            public_key,
            private_key,
            signature,
            start_time: now,
            duration_days: self.duration_days,
        };

        self.store.save(&key, &session)?;
        tracing::info!(key = %key.to_hex(), "authorization session created");
        Ok(session)
    }
}
