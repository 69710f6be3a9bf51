//! Ledger error types

use cipherboard_fhe::{FheError, Principal};
use thiserror::Error;

/// Errors that can occur during ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Submitting principal holds no eligible asset
    #[error("Principal {0} holds no eligible asset")]
    NotEligible(Principal),

    /// Co-processor boundary failure
    #[error("FHE error: {0}")]
    Fhe(#[from] FheError),
}
