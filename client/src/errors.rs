//! Client error types
//!
//! Staleness is deliberately absent: a stale completion is an informational
//! outcome (`DecryptOutcome::Ignored`), not an error.

use thiserror::Error;

/// Errors during the authorization ceremony
#[derive(Error, Debug)]
pub enum SessionError {
    /// User declined or failed the signature ceremony; retry by calling
    /// `load_or_create` again
    #[error("Signature request denied by signer")]
    SignatureDenied,

    /// Session cache store failure
    #[error("Session store error: {0}")]
    Store(String),
}

/// Errors during a decryption request
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The oracle refused: no access grant for a requested handle. If the
    /// caller is the legitimate owner this indicates an access-control bug.
    #[error("Decryption denied: missing access grant")]
    DecryptionDenied,

    /// Session window elapsed; obtain a fresh session
    #[error("Authorization session expired")]
    SessionExpired,

    /// Session is bound to a different signing identity than the current one
    #[error("Session identity does not match current signer")]
    IdentityMismatch,

    /// Session is bound to a different network than the current one
    #[error("Session network does not match current network")]
    NetworkMismatch,

    /// Oracle transport or protocol failure; never retried automatically
    #[error("Oracle failure: {0}")]
    Oracle(String),
}
