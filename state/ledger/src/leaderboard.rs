//! Leaderboard projection
//!
//! A plaintext-safe view over the ledger: principals and submission times
//! only, never ciphertext values. Ordering is by recency (most recent
//! submission first), not by score, because scores are encrypted at
//! projection time. Ties keep first-submission order. Every call recomputes
//! from current ledger state; nothing is cached.

use crate::ledger::ScoreLedger;
use cipherboard_fhe::{Principal, Timestamp};
use serde::{Deserialize, Serialize};

/// One row of the public leaderboard view
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Record owner
    pub principal: Principal,
    /// 1-based position by recency
    pub rank: usize,
    /// Time of the owner's most recent submission
    pub submitted_at: Timestamp,
}

/// Project the full leaderboard, most recent submission first
pub fn project(ledger: &ScoreLedger) -> Vec<LeaderboardEntry> {
    let mut rows: Vec<(Principal, Timestamp)> = ledger
        .records_in_order()
        .filter(|record| record.exists)
        .map(|record| (record.owner, record.submitted_at))
        .collect();

    // Stable sort: equal timestamps keep first-submission order.
    rows.sort_by(|a, b| b.1.cmp(&a.1));

    rows.into_iter()
        .enumerate()
        .map(|(i, (principal, submitted_at))| LeaderboardEntry {
            principal,
            rank: i + 1,
            submitted_at,
        })
        .collect()
}

/// Project a slice of the leaderboard
///
/// Returns an empty sequence when `start` is past the end; `count` is
/// clamped to the available remainder. Ranks stay global.
pub fn project_range(ledger: &ScoreLedger, start: usize, count: usize) -> Vec<LeaderboardEntry> {
    let full = project(ledger);
    if start >= full.len() {
        return Vec::new();
    }
    let end = start.saturating_add(count).min(full.len());
    full[start..end].to_vec()
}
