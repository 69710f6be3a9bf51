//! CIPHERBOARD: Privacy-Preserving Arcade Score Ledger
//!
//! This is the root crate that re-exports all cipherboard components for
//! integration testing and provides the facade the rendering/game loop
//! talks to.
//!
//! ## Architecture Overview
//!
//! Scores live as opaque ciphertext handles inside an external FHE
//! co-processor. The ledger updates them with homomorphic compare-and-keep-
//! maximum, so neither the ledger nor any observer learns a plaintext
//! value. Disclosure happens only client-side, through a signature-gated,
//! time-boxed authorization session and a staleness-guarded request
//! pipeline.
//!
//! ## Crate Organization
//!
//! - `cipherboard-fhe`: handles, identities, and the co-processor seam
//! - `cipherboard-ledger`: score ledger, max aggregator, access control,
//!   leaderboard projection
//! - `cipherboard-client`: authorization sessions and the decryption
//!   request pipeline

pub mod arcade;

// Re-export all crates for integration testing
pub use cipherboard_client as client;
pub use cipherboard_fhe as fhe;
pub use cipherboard_ledger as ledger;

pub use arcade::{ArcadeConfig, ArcadeError, ArcadeService, LocalOracle, SubmitOutcome};

/// cipherboard protocol version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::arcade::{ArcadeConfig, ArcadeError, ArcadeService, SubmitOutcome};
    pub use cipherboard_client::{
        AuthorizationSession, ContextSnapshot, DecryptOutcome, DecryptionPipeline,
        InMemorySessionStore, SessionManager, SessionSigner, SharedContext,
    };
    pub use cipherboard_fhe::{
        AssetId, Ciphertext, ContractRef, Coprocessor, NetworkId, Principal, Timestamp,
    };
    pub use cipherboard_ledger::{LeaderboardEntry, ScoreLedger, ScoreRecord};
}
