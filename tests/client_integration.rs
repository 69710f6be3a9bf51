//! Client Integration Tests
//!
//! The full disclosure path through the arcade facade: session ceremony and
//! caching, staleness fail-closed behavior when identity or network changes,
//! the zero-sentinel short circuit, and the single-flight guards.

use async_trait::async_trait;
use cipherboard::prelude::*;
use cipherboard::ArcadeError;
use cipherboard::client::{
    AuthorizationMessage, PipelineError, SessionError, SessionResult,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct CountingSigner {
    ceremonies: AtomicUsize,
}

impl CountingSigner {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            ceremonies: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl SessionSigner for CountingSigner {
    async fn sign_authorization(
        &self,
        _identity: Principal,
        message: &AuthorizationMessage,
    ) -> SessionResult<Vec<u8>> {
        self.ceremonies.fetch_add(1, Ordering::SeqCst);
        Ok(message.digest().to_vec())
    }
}

struct DenyingSigner;

#[async_trait]
impl SessionSigner for DenyingSigner {
    async fn sign_authorization(
        &self,
        _identity: Principal,
        _message: &AuthorizationMessage,
    ) -> SessionResult<Vec<u8>> {
        Err(SessionError::SignatureDenied)
    }
}

fn service_with(signer: Arc<dyn SessionSigner>) -> ArcadeService {
    ArcadeService::new(
        ArcadeConfig::local(),
        signer,
        Arc::new(InMemorySessionStore::new()),
    )
}

#[tokio::test]
async fn submit_then_reveal_round_trip() {
    let service = service_with(CountingSigner::new());
    let alice = Principal::derive("alice");
    service.register_asset(alice, AssetId(1));
    service.connect(alice);

    service.submit_score(alice, 50).await.unwrap();
    service.submit_score(alice, 30).await.unwrap();

    let session = service.authorize(alice).await.unwrap();
    let outcome = service.own_score(alice, &session).await.unwrap();
    assert_eq!(outcome, DecryptOutcome::Plaintext(50));
}

#[tokio::test]
async fn session_ceremony_runs_once_per_identity_and_scope() {
    let signer = CountingSigner::new();
    let service = service_with(signer.clone());
    let alice = Principal::derive("alice");
    service.register_asset(alice, AssetId(1));
    service.connect(alice);
    service.submit_score(alice, 10).await.unwrap();

    let first = service.authorize(alice).await.unwrap();
    let second = service.authorize(alice).await.unwrap();
    assert_eq!(signer.ceremonies.load(Ordering::SeqCst), 1);
    assert_eq!(first.public_key, second.public_key);

    service.own_score(alice, &first).await.unwrap();
    service.own_score(alice, &second).await.unwrap();
    assert_eq!(signer.ceremonies.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn denied_ceremony_surfaces_and_is_retryable() {
    let service = service_with(Arc::new(DenyingSigner));
    let alice = Principal::derive("alice");
    service.connect(alice);

    let result = service.authorize(alice).await;
    assert!(matches!(
        result,
        Err(ArcadeError::Session(SessionError::SignatureDenied))
    ));
}

#[tokio::test]
async fn identity_switch_fails_closed() {
    let service = service_with(CountingSigner::new());
    let alice = Principal::derive("alice");
    let bob = Principal::derive("bob");
    service.register_asset(alice, AssetId(1));
    service.connect(alice);
    service.submit_score(alice, 50).await.unwrap();

    let session = service.authorize(alice).await.unwrap();

    // Wallet switches to another account; Alice's session must not be
    // usable under the new identity.
    service.connect(bob);
    let result = service.own_score(alice, &session).await;
    assert!(matches!(
        result,
        Err(ArcadeError::Pipeline(PipelineError::IdentityMismatch))
    ));
}

#[tokio::test]
async fn network_switch_fails_closed() {
    let service = service_with(CountingSigner::new());
    let alice = Principal::derive("alice");
    service.register_asset(alice, AssetId(1));
    service.connect(alice);
    service.submit_score(alice, 50).await.unwrap();

    let session = service.authorize(alice).await.unwrap();

    service.context().set_network(NetworkId(31337));
    let result = service.own_score(alice, &session).await;
    assert!(matches!(
        result,
        Err(ArcadeError::Pipeline(PipelineError::NetworkMismatch))
    ));
}

#[tokio::test]
async fn never_submitted_discloses_zero_without_oracle() {
    let service = service_with(CountingSigner::new());
    let alice = Principal::derive("alice");
    service.register_asset(alice, AssetId(1));
    service.connect(alice);

    // No submission: the handle is the zero sentinel. Zero handles before,
    // zero handles after proves no co-processor traffic happened.
    let session = service.authorize(alice).await.unwrap();
    let before = service.coprocessor().handle_count();
    let outcome = service.own_score(alice, &session).await.unwrap();
    assert_eq!(outcome, DecryptOutcome::Plaintext(0));
    assert_eq!(service.coprocessor().handle_count(), before);
}

#[tokio::test]
async fn leaderboard_tracks_recency_through_facade() {
    let service = service_with(CountingSigner::new());
    let alice = Principal::derive("alice");
    let bob = Principal::derive("bob");
    service.register_asset(alice, AssetId(1));
    service.register_asset(bob, AssetId(2));

    service.submit_score(alice, 90).await.unwrap();
    // Wall-clock timestamps at millisecond grain; keep the submissions apart.
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    service.submit_score(bob, 10).await.unwrap();

    // Bob submitted more recently, so Bob ranks first despite the lower
    // (encrypted, invisible) score.
    let board = service.leaderboard().await;
    assert_eq!(board[0].principal, bob);
    assert_eq!(board[1].principal, alice);

    let page = service.leaderboard_page(1, 5).await;
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].principal, alice);
    assert_eq!(page[0].rank, 2);
}
