//! Ledger Integration Tests
//!
//! End-to-end checks of the encrypted score ledger: eligibility gating,
//! homomorphic keep-maximum semantics, the unconditional timestamp refresh,
//! the global max aggregate, grants, and the recency leaderboard.

use cipherboard::fhe::{
    AssetId, Ciphertext, Coprocessor, EncryptionProof, FheConfig, LocalCoprocessor, Principal,
    Timestamp,
};
use cipherboard::ledger::{
    leaderboard, InMemoryEligibility, LedgerError, ScoreLedger,
};
use std::sync::Arc;

struct World {
    coprocessor: Arc<LocalCoprocessor>,
    registry: Arc<InMemoryEligibility>,
    ledger: ScoreLedger,
}

fn world() -> World {
    let coprocessor = Arc::new(LocalCoprocessor::new(FheConfig::random()));
    let registry = Arc::new(InMemoryEligibility::new());
    let ledger = ScoreLedger::new(
        coprocessor.clone(),
        registry.clone(),
        Principal::derive("authority"),
    );
    World {
        coprocessor,
        registry,
        ledger,
    }
}

fn encrypt(cp: &LocalCoprocessor, value: u32) -> Ciphertext {
    let raw = value.to_le_bytes();
    cp.encrypt_external(&raw, &EncryptionProof::prove(&raw))
        .unwrap()
}

#[test]
fn ineligible_principal_never_gets_a_record() {
    let mut w = world();
    let outsider = Principal::derive("outsider");

    for value in [10u32, 0, 500] {
        let ct = encrypt(&w.coprocessor, value);
        let result = w.ledger.submit_at(outsider, ct, Timestamp(1));
        assert!(matches!(result, Err(LedgerError::NotEligible(_))));
    }

    assert!(w.ledger.get(&outsider).is_none());
    assert!(w.ledger.is_empty());
    assert!(!w.ledger.max().has_value());
    assert!(leaderboard::project(&w.ledger).is_empty());
}

#[test]
fn spec_scenario_two_players() {
    // A submits 50, then 30 (no improvement); B submits 80.
    let mut w = world();
    let a = Principal::derive("player-a");
    let b = Principal::derive("player-b");
    w.registry.register(a, AssetId(1));
    w.registry.register(b, AssetId(2));

    let ct = encrypt(&w.coprocessor, 50);
    w.ledger.submit_at(a, ct, Timestamp(100)).unwrap();
    assert_eq!(w.coprocessor.reveal(w.ledger.get(&a).unwrap().ciphertext), 50);

    let ct = encrypt(&w.coprocessor, 30);
    w.ledger.submit_at(a, ct, Timestamp(200)).unwrap();
    let record = w.ledger.get(&a).unwrap();
    assert_eq!(w.coprocessor.reveal(record.ciphertext), 50);
    assert_eq!(record.submitted_at, Timestamp(200));

    let ct = encrypt(&w.coprocessor, 80);
    w.ledger.submit_at(b, ct, Timestamp(300)).unwrap();
    assert_eq!(w.coprocessor.reveal(w.ledger.max().ciphertext()), 80);

    // B submitted most recently, so B ranks first; purely by recency.
    let board = leaderboard::project(&w.ledger);
    assert_eq!(board.len(), 2);
    assert_eq!(board[0].principal, b);
    assert_eq!(board[0].rank, 1);
    assert_eq!(board[1].principal, a);
    assert_eq!(board[1].rank, 2);
}

#[test]
fn single_principal_keeps_running_maximum() {
    let mut w = world();
    let a = Principal::derive("player-a");
    w.registry.register(a, AssetId(1));

    let scores = [50u32, 30, 90, 90, 10];
    for (i, value) in scores.iter().enumerate() {
        let ct = encrypt(&w.coprocessor, *value);
        w.ledger.submit_at(a, ct, Timestamp(i as u64)).unwrap();
    }

    let record = w.ledger.get(&a).unwrap();
    assert_eq!(w.coprocessor.reveal(record.ciphertext), 90);
    assert_eq!(record.submitted_at, Timestamp(4));
    assert_eq!(w.ledger.len(), 1);
}

#[test]
fn global_max_is_order_independent() {
    let submissions = [("a", 12u32), ("b", 99), ("c", 7), ("a", 54)];

    let run = |order: &[usize]| -> u32 {
        let mut w = world();
        for &i in order {
            let (name, value) = submissions[i];
            let p = Principal::derive(name);
            w.registry.register(p, AssetId(1));
            let ct = encrypt(&w.coprocessor, value);
            w.ledger.submit_at(p, ct, Timestamp(i as u64)).unwrap();
        }
        w.coprocessor.reveal(w.ledger.max().ciphertext())
    };

    assert_eq!(run(&[0, 1, 2, 3]), 99);
    assert_eq!(run(&[3, 2, 1, 0]), 99);
    assert_eq!(run(&[2, 0, 3, 1]), 99);
}

#[test]
fn replaced_handle_keeps_owner_grant() {
    let mut w = world();
    let a = Principal::derive("player-a");
    w.registry.register(a, AssetId(1));

    let first = encrypt(&w.coprocessor, 50);
    w.ledger.submit_at(a, first, Timestamp(1)).unwrap();
    let first_stored = w.ledger.get(&a).unwrap().ciphertext;

    let second = encrypt(&w.coprocessor, 70);
    w.ledger.submit_at(a, second, Timestamp(2)).unwrap();
    let second_stored = w.ledger.get(&a).unwrap().ciphertext;

    // Handles are never reused; the replacement is a fresh handle carrying
    // fresh grants, and the superseded grant is harmless.
    assert_ne!(first_stored, second_stored);
    assert!(w.ledger.acl().is_granted(&second_stored, &a));
    assert!(w.ledger.acl().is_granted(&second_stored, &w.ledger.authority()));
    assert!(w.ledger.acl().is_granted(&first_stored, &a));
}

#[test]
fn leaderboard_projection_is_pure() {
    let mut w = world();
    for (i, name) in ["a", "b", "c", "d"].iter().enumerate() {
        let p = Principal::derive(name);
        w.registry.register(p, AssetId(1));
        let ct = encrypt(&w.coprocessor, 10);
        w.ledger.submit_at(p, ct, Timestamp(i as u64 * 10)).unwrap();
    }

    let first = leaderboard::project(&w.ledger);
    let second = leaderboard::project(&w.ledger);
    assert_eq!(first, second);

    // Ranks are contiguous from 1 and timestamps never increase.
    for (i, entry) in first.iter().enumerate() {
        assert_eq!(entry.rank, i + 1);
        if i > 0 {
            assert!(entry.submitted_at <= first[i - 1].submitted_at);
        }
    }

    // Slicing clamps to the data and keeps global ranks.
    let page = leaderboard::project_range(&w.ledger, 2, 50);
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].rank, 3);
    assert!(leaderboard::project_range(&w.ledger, 4, 1).is_empty());
}

#[test]
fn eligibility_is_checked_on_every_submission() {
    let mut w = world();
    let a = Principal::derive("player-a");
    w.registry.register(a, AssetId(1));

    let ct = encrypt(&w.coprocessor, 40);
    w.ledger.submit_at(a, ct, Timestamp(1)).unwrap();

    // Registry membership disappears between submissions.
    w.registry.revoke_all(&a);
    let ct = encrypt(&w.coprocessor, 60);
    let result = w.ledger.submit_at(a, ct, Timestamp(2));
    assert!(matches!(result, Err(LedgerError::NotEligible(_))));

    // The earlier record is untouched.
    let record = w.ledger.get(&a).unwrap();
    assert_eq!(w.coprocessor.reveal(record.ciphertext), 40);
    assert_eq!(record.submitted_at, Timestamp(1));
}
