//! CIPHERBOARD Score Ledger
//!
//! One encrypted score per participant, updated homomorphically on every
//! submission. The ledger never learns whether a submission raised a score:
//! the compare-and-keep-maximum happens entirely inside the co-processor's
//! `greater_than`/`select` primitives.
//!
//! # Components
//! - `EligibilityProvider`: boolean membership gate consulted on every submit
//! - `ScoreLedger`: one `(ciphertext, timestamp)` record per principal
//! - `MaxState`: running encrypted maximum over all submissions
//! - `AccessControl`: per-`(ciphertext, principal)` decryption grants
//! - `leaderboard`: recency-ranked plaintext-safe projection
//!
//! All mutable state lives in one explicitly constructed `ScoreLedger`
//! instance; mutations go through `&mut self` and apply in a total order.

pub mod acl;
pub mod aggregator;
pub mod errors;
pub mod leaderboard;
pub mod ledger;
pub mod registry;

pub use acl::AccessControl;
pub use aggregator::MaxState;
pub use errors::LedgerError;
pub use leaderboard::{project, project_range, LeaderboardEntry};
pub use ledger::{ScoreLedger, ScoreRecord};
pub use registry::{EligibilityProvider, InMemoryEligibility};

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
