//! Arcade service facade
//!
//! What the rendering/game loop talks to: plaintext in, leaderboard rows
//! and owner-only plaintext out. Everything between is encrypted. The
//! service owns the single ledger instance (no ambient globals) and wires
//! the local co-processor, the grant set, and the client pipeline together.

use cipherboard_client::{
    AuthorizationSession, ContextSnapshot, DecryptOutcome, DecryptionOracle, DecryptionPipeline,
    DecryptionRequest, PipelineError, SessionError, SessionManager, SessionSigner, SessionStore,
    SharedContext, SingleFlight,
};
use cipherboard_fhe::{
    AssetId, Ciphertext, ContractRef, Coprocessor, EncryptionProof, FheConfig, FheError,
    LocalCoprocessor, NetworkId, Principal, Timestamp,
};
use cipherboard_ledger::{
    leaderboard, InMemoryEligibility, LeaderboardEntry, LedgerError, ScoreLedger, ScoreRecord,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Facade-level errors
#[derive(Debug, thiserror::Error)]
pub enum ArcadeError {
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
    #[error("FHE error: {0}")]
    Fhe(#[from] FheError),
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}

/// Result of a score submission through the facade
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The ledger accepted the submission
    Submitted,
    /// A submission is already outstanding for this caller context; no-op
    InFlight,
}

/// Service configuration
#[derive(Clone, Debug)]
pub struct ArcadeConfig {
    /// Contract scope score handles belong to
    pub contract: ContractRef,
    /// Network the service runs on
    pub network: NetworkId,
    /// Co-processor service identity, receiving standing grants
    pub authority: Principal,
}

impl ArcadeConfig {
    /// Local single-process configuration
    pub fn local() -> Self {
        Self {
            contract: ContractRef::derive("cipherboard/scores"),
            network: NetworkId(1),
            authority: Principal::derive("cipherboard/coprocessor"),
        }
    }
}

/// Decryption oracle over the local co-processor
///
/// Enforces exactly what the remote oracle would: the session window must
/// cover the request time and every requested handle must carry a grant for
/// the signing identity.
pub struct LocalOracle {
    coprocessor: Arc<LocalCoprocessor>,
    ledger: Arc<RwLock<ScoreLedger>>,
}

impl LocalOracle {
    /// Create an oracle over a co-processor and the ledger's grant set
    pub fn new(coprocessor: Arc<LocalCoprocessor>, ledger: Arc<RwLock<ScoreLedger>>) -> Self {
        Self {
            coprocessor,
            ledger,
        }
    }
}

#[async_trait]
impl DecryptionOracle for LocalOracle {
    async fn user_decrypt(
        &self,
        request: &DecryptionRequest,
    ) -> Result<HashMap<Ciphertext, u32>, PipelineError> {
        let now = Timestamp::now();
        if now >= request.start_time.plus_days(request.duration_days) {
            return Err(PipelineError::SessionExpired);
        }
        if request.signature.is_empty() {
            return Err(PipelineError::Oracle("unsigned request".into()));
        }

        let ledger = self.ledger.read().await;
        for handle in &request.handles {
            if !ledger.acl().is_granted(handle, &request.signing_identity) {
                return Err(PipelineError::DecryptionDenied);
            }
        }

        Ok(request
            .handles
            .iter()
            .map(|h| (*h, self.coprocessor.reveal(*h)))
            .collect())
    }
}

/// The service exposed to the game loop
pub struct ArcadeService {
    config: ArcadeConfig,
    coprocessor: Arc<LocalCoprocessor>,
    registry: Arc<InMemoryEligibility>,
    ledger: Arc<RwLock<ScoreLedger>>,
    context: SharedContext,
    pipeline: DecryptionPipeline,
    sessions: SessionManager,
    submit_flight: SingleFlight,
}

impl ArcadeService {
    /// Assemble a service around the local co-processor
    pub fn new(
        config: ArcadeConfig,
        signer: Arc<dyn SessionSigner>,
        session_store: Arc<dyn SessionStore>,
    ) -> Self {
        let coprocessor = Arc::new(LocalCoprocessor::new(FheConfig::random()));
        let registry = Arc::new(InMemoryEligibility::new());
        let ledger = Arc::new(RwLock::new(ScoreLedger::new(
            coprocessor.clone(),
            registry.clone(),
            config.authority,
        )));

        let context = SharedContext::new(ContextSnapshot {
            contract: config.contract,
            network: config.network,
            identity: config.authority,
        });
        let oracle = Arc::new(LocalOracle::new(coprocessor.clone(), ledger.clone()));
        let pipeline = DecryptionPipeline::new(oracle, Arc::new(context.clone()));
        let sessions = SessionManager::new(signer, session_store);

        Self {
            config,
            coprocessor,
            registry,
            ledger,
            context,
            pipeline,
            sessions,
            submit_flight: SingleFlight::new(),
        }
    }

    /// Mark the connected player; later pipeline calls fail closed against
    /// a session bound to anyone else
    pub fn connect(&self, principal: Principal) {
        self.context.set_identity(principal);
    }

    /// The caller-context source, for wallet/network change notifications
    pub fn context(&self) -> SharedContext {
        self.context.clone()
    }

    /// Record an eligibility asset for a principal
    pub fn register_asset(&self, principal: Principal, asset: AssetId) {
        self.registry.register(principal, asset);
    }

    /// Encrypt and submit a plaintext score
    ///
    /// At most one submission is outstanding per service; a concurrent
    /// second call is a no-op.
    pub async fn submit_score(
        &self,
        principal: Principal,
        score: u32,
    ) -> Result<SubmitOutcome, ArcadeError> {
        let _guard = match self.submit_flight.try_begin() {
            Some(guard) => guard,
            None => return Ok(SubmitOutcome::InFlight),
        };

        let raw = score.to_le_bytes();
        let proof = EncryptionProof::prove(&raw);
        let ciphertext = self.coprocessor.encrypt_external(&raw, &proof)?;

        self.ledger.write().await.submit(principal, ciphertext)?;
        tracing::info!(principal = %principal, "score submitted");
        Ok(SubmitOutcome::Submitted)
    }

    /// Obtain (or reuse) the player's authorization session
    pub async fn authorize(
        &self,
        principal: Principal,
    ) -> Result<AuthorizationSession, ArcadeError> {
        let session = self
            .sessions
            .load_or_create(principal, self.config.network, &[self.config.contract])
            .await?;
        Ok(session)
    }

    /// Decrypt the caller's own score through the request pipeline
    ///
    /// Players who never submitted hold the zero sentinel, which discloses
    /// plaintext 0 without an oracle call.
    pub async fn own_score(
        &self,
        principal: Principal,
        session: &AuthorizationSession,
    ) -> Result<DecryptOutcome, ArcadeError> {
        let handle = {
            let ledger = self.ledger.read().await;
            ledger
                .get(&principal)
                .map(|record| record.ciphertext)
                .unwrap_or(Ciphertext::ZERO)
        };
        let outcome = self.pipeline.decrypt(handle, session).await?;
        Ok(outcome)
    }

    /// Full leaderboard, most recent submission first
    pub async fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let ledger = self.ledger.read().await;
        leaderboard::project(&ledger)
    }

    /// One page of the leaderboard
    pub async fn leaderboard_page(&self, start: usize, count: usize) -> Vec<LeaderboardEntry> {
        let ledger = self.ledger.read().await;
        leaderboard::project_range(&ledger, start, count)
    }

    /// A player's record, if any
    pub async fn record(&self, principal: Principal) -> Option<ScoreRecord> {
        self.ledger.read().await.get(&principal).copied()
    }

    /// Handle of the running encrypted maximum, once any score exists
    pub async fn encrypted_max(&self) -> Option<Ciphertext> {
        let ledger = self.ledger.read().await;
        ledger.max().has_value().then(|| ledger.max().ciphertext())
    }

    /// Number of populated records
    pub async fn player_count(&self) -> usize {
        self.ledger.read().await.len()
    }

    /// The service configuration
    pub fn config(&self) -> &ArcadeConfig {
        &self.config
    }

    /// The backing co-processor (local mode)
    pub fn coprocessor(&self) -> Arc<LocalCoprocessor> {
        self.coprocessor.clone()
    }
}
