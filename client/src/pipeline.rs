//! Decryption request pipeline
//!
//! Turns a ciphertext handle plus a valid authorization session into a
//! plaintext, via the external decryption oracle. The user's wallet may
//! switch accounts or networks while a request is in flight; rather than a
//! cancel API, every request carries a staleness token captured at start
//! and revalidated immediately before any result becomes visible. A
//! completed-but-stale result is discarded and reported as ignored.
//!
//! At most one decryption is outstanding per pipeline; a second call while
//! one is in flight is a no-op, not queued and not an error.

use crate::errors::PipelineError;
use crate::keys::SecretBytes;
use crate::session::AuthorizationSession;
use crate::PipelineResult;
use async_trait::async_trait;
use cipherboard_fhe::{Ciphertext, ContractRef, NetworkId, Principal, Timestamp};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// The caller's execution context, captured at request start
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ContextSnapshot {
    /// Contract the target handles belong to
    pub contract: ContractRef,
    /// Connected network
    pub network: NetworkId,
    /// Current signing identity
    pub identity: Principal,
}

/// Source of the current execution context
pub trait ContextProvider: Send + Sync {
    /// The caller's context as of now
    fn current(&self) -> ContextSnapshot;
}

/// Context that never changes; embedded and test use
pub struct FixedContext(pub ContextSnapshot);

impl ContextProvider for FixedContext {
    fn current(&self) -> ContextSnapshot {
        self.0
    }
}

/// Context that tracks wallet/network changes
#[derive(Clone)]
pub struct SharedContext {
    inner: Arc<RwLock<ContextSnapshot>>,
}

impl SharedContext {
    /// Create with an initial snapshot
    pub fn new(snapshot: ContextSnapshot) -> Self {
        Self {
            inner: Arc::new(RwLock::new(snapshot)),
        }
    }

    /// Record a network switch
    pub fn set_network(&self, network: NetworkId) {
        self.inner.write().network = network;
    }

    /// Record an account switch
    pub fn set_identity(&self, identity: Principal) {
        self.inner.write().identity = identity;
    }

    /// Record a change of target contract
    pub fn set_contract(&self, contract: ContractRef) {
        self.inner.write().contract = contract;
    }
}

impl ContextProvider for SharedContext {
    fn current(&self) -> ContextSnapshot {
        *self.inner.read()
    }
}

/// Optimistic concurrency token
///
/// Issued at request start; `is_stale` compares the captured snapshot
/// against the provider's current view. Present and revalidate the token
/// before committing any externally visible effect.
pub struct StalenessToken {
    snapshot: ContextSnapshot,
    provider: Arc<dyn ContextProvider>,
}

impl StalenessToken {
    /// Capture the current context
    pub fn issue(provider: Arc<dyn ContextProvider>) -> Self {
        Self {
            snapshot: provider.current(),
            provider,
        }
    }

    /// The context as of issue time
    pub fn snapshot(&self) -> &ContextSnapshot {
        &self.snapshot
    }

    /// Whether contract, network, or identity changed since issue
    pub fn is_stale(&self) -> bool {
        let current = self.provider.current();
        current.contract != self.snapshot.contract
            || current.network != self.snapshot.network
            || current.identity != self.snapshot.identity
    }
}

/// One-outstanding-operation guard
///
/// `try_begin` yields a guard while the slot is free; the slot frees when
/// the guard drops. Used for decryption here and, symmetrically, for
/// submission in callers that wrap the ledger.
#[derive(Default)]
pub struct SingleFlight {
    busy: AtomicBool,
}

impl SingleFlight {
    /// Create a free slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot, or `None` if an operation is already outstanding
    pub fn try_begin(&self) -> Option<FlightGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(FlightGuard { flag: &self.busy })
    }

    /// Whether an operation is outstanding
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the slot on drop
pub struct FlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Everything the oracle needs to authorize and serve a disclosure
#[derive(Clone, Debug)]
pub struct DecryptionRequest {
    /// Handles to disclose
    pub handles: Vec<Ciphertext>,
    /// Session ephemeral public key
    pub public_key: Vec<u8>,
    /// Session ephemeral private key
    pub private_key: SecretBytes,
    /// Session signature
    pub signature: Vec<u8>,
    /// Session contract scopes
    pub scoped_contracts: Vec<ContractRef>,
    /// Session signing identity
    pub signing_identity: Principal,
    /// Session window start
    pub start_time: Timestamp,
    /// Session window length in days
    pub duration_days: u64,
}

impl DecryptionRequest {
    /// Build a request from a session and target handles
    pub fn new(handles: Vec<Ciphertext>, session: &AuthorizationSession) -> Self {
        Self {
            handles,
            public_key: session.public_key.clone(),
            private_key: session.private_key.clone(),
            signature: session.signature.clone(),
            scoped_contracts: session.scoped_contracts.clone(),
            signing_identity: session.signing_identity,
            start_time: session.start_time,
            duration_days: session.duration_days,
        }
    }
}

/// The external decryption oracle
///
/// Verifies the session material and the access grants for every requested
/// handle; fails with `PipelineError::DecryptionDenied` when any grant is
/// missing. Failures are surfaced, never retried by the pipeline.
#[async_trait]
pub trait DecryptionOracle: Send + Sync {
    /// Disclose the plaintexts behind the requested handles
    async fn user_decrypt(
        &self,
        request: &DecryptionRequest,
    ) -> PipelineResult<HashMap<Ciphertext, u32>>;
}

/// Result of a decryption request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecryptOutcome {
    /// Disclosure succeeded; visible only to this caller
    Plaintext(u32),
    /// Completed, but the context changed mid-flight; result discarded
    Ignored,
    /// Another request is outstanding; this call was a no-op
    InFlight,
}

/// Staleness-guarded path from handle to plaintext
pub struct DecryptionPipeline {
    oracle: Arc<dyn DecryptionOracle>,
    context: Arc<dyn ContextProvider>,
    in_flight: SingleFlight,
}

impl DecryptionPipeline {
    /// Create a pipeline over an oracle and a context source
    pub fn new(oracle: Arc<dyn DecryptionOracle>, context: Arc<dyn ContextProvider>) -> Self {
        Self {
            oracle,
            context,
            in_flight: SingleFlight::new(),
        }
    }

    /// Issue a staleness token against this pipeline's context
    pub fn issue_token(&self) -> StalenessToken {
        StalenessToken::issue(self.context.clone())
    }

    /// Decrypt a handle, checking the session window against the wall clock
    pub async fn decrypt(
        &self,
        handle: Ciphertext,
        session: &AuthorizationSession,
    ) -> PipelineResult<DecryptOutcome> {
        self.decrypt_at(handle, session, Timestamp::now()).await
    }

    /// Decrypt a handle with an explicit clock reading
    ///
    /// Fails closed, with no oracle call, when the session does not match
    /// the current identity or network, or its window has elapsed. The
    /// all-zero sentinel short-circuits to plaintext 0.
    pub async fn decrypt_at(
        &self,
        handle: Ciphertext,
        session: &AuthorizationSession,
        now: Timestamp,
    ) -> PipelineResult<DecryptOutcome> {
        let token = self.issue_token();
        let snapshot = *token.snapshot();

        if session.signing_identity != snapshot.identity {
            return Err(PipelineError::IdentityMismatch);
        }
        if session.network != snapshot.network {
            return Err(PipelineError::NetworkMismatch);
        }
        if !session.is_valid_at(now) {
            return Err(PipelineError::SessionExpired);
        }

        // "Never submitted" placeholder: plaintext 0, no oracle involved.
        if handle.is_zero() {
            return Ok(DecryptOutcome::Plaintext(0));
        }

        let _guard = match self.in_flight.try_begin() {
            Some(guard) => guard,
            None => {
                tracing::debug!(handle = %handle.to_hex(), "decryption already in flight");
                return Ok(DecryptOutcome::InFlight);
            }
        };

        let request = DecryptionRequest::new(vec![handle], session);
        let result = self.oracle.user_decrypt(&request).await;

        if token.is_stale() {
            tracing::info!(handle = %handle.to_hex(), "context changed mid-flight, result discarded");
            return Ok(DecryptOutcome::Ignored);
        }

        let plaintexts = result?;
        let value = plaintexts
            .get(&handle)
            .copied()
            .ok_or_else(|| PipelineError::Oracle("handle missing from oracle response".into()))?;

        Ok(DecryptOutcome::Plaintext(value))
    }
}
