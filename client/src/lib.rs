//! CIPHERBOARD Client
//!
//! Client-side half of the privacy-preserving score ledger: obtaining a
//! time-boxed, identity- and scope-bound capability to decrypt specific
//! ciphertext handles, and spending that capability through a cancellable
//! request pipeline.
//!
//! # Flow
//! 1. `SessionManager::load_or_create` returns a cached authorization
//!    session or runs the signature ceremony (user-mediated, may be denied)
//! 2. `DecryptionPipeline::decrypt` consumes a session plus a handle,
//!    guarded by a staleness token captured at request start
//!
//! A completed-but-stale decryption is discarded and reported as ignored,
//! never surfaced as a failure. There is no explicit cancel API.

pub mod errors;
pub mod keys;
pub mod pipeline;
pub mod session;
pub mod store;

pub use errors::{PipelineError, SessionError};
pub use keys::EphemeralKeypair;
pub use pipeline::{
    ContextProvider, ContextSnapshot, DecryptOutcome, DecryptionOracle, DecryptionPipeline,
    DecryptionRequest, FixedContext, SharedContext, SingleFlight, StalenessToken,
};
pub use session::{
    AuthorizationMessage, AuthorizationSession, SessionKey, SessionManager, SessionSigner,
    SessionState, SESSION_DURATION_DAYS,
};
pub use store::{InMemorySessionStore, JsonFileSessionStore, SessionStore};

/// Result type for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;
