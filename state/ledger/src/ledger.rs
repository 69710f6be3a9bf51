//! The encrypted score ledger
//!
//! One `ScoreRecord` per principal, mutated in place on resubmission. The
//! stored ciphertext always decrypts to the maximum value the principal ever
//! submitted; the stored timestamp is the time of the most recent submission
//! whether or not it raised the score. That timestamp asymmetry is
//! intentional and must be preserved.
//!
//! The ledger is the only owner of the grant set and the running maximum.
//! Mutations take `&mut self`, so on any execution substrate they apply
//! atomically and in a total order.

use crate::acl::AccessControl;
use crate::aggregator::MaxState;
use crate::errors::LedgerError;
use crate::registry::EligibilityProvider;
use crate::LedgerResult;
use cipherboard_fhe::{Ciphertext, Coprocessor, Principal, Timestamp};
use std::collections::HashMap;
use std::sync::Arc;

/// One participant's encrypted score
#[derive(Clone, Copy, Debug)]
pub struct ScoreRecord {
    /// Record owner
    pub owner: Principal,
    /// Handle of the current best score
    pub ciphertext: Ciphertext,
    /// Time of the most recent submission, improving or not
    pub submitted_at: Timestamp,
    /// Whether the record has been populated
    pub exists: bool,
}

/// The score ledger instance
///
/// Explicitly constructed; owns all mutable shared state (records, grant
/// set, running maximum). Nothing here is process-global.
pub struct ScoreLedger {
    coprocessor: Arc<dyn Coprocessor>,
    eligibility: Arc<dyn EligibilityProvider>,
    /// Service identity of the co-processor, receiving standing grants
    authority: Principal,
    records: HashMap<Principal, ScoreRecord>,
    /// First-submission order, the stable tie-break for projections
    order: Vec<Principal>,
    max: MaxState,
    acl: AccessControl,
}

impl ScoreLedger {
    /// Create an empty ledger
    pub fn new(
        coprocessor: Arc<dyn Coprocessor>,
        eligibility: Arc<dyn EligibilityProvider>,
        authority: Principal,
    ) -> Self {
        Self {
            coprocessor,
            eligibility,
            authority,
            records: HashMap::new(),
            order: Vec::new(),
            max: MaxState::new(),
            acl: AccessControl::new(),
        }
    }

    /// Submit an encrypted score, stamped with the current time
    pub fn submit(&mut self, principal: Principal, ciphertext: Ciphertext) -> LedgerResult<()> {
        self.submit_at(principal, ciphertext, Timestamp::now())
    }

    /// Submit an encrypted score with an explicit timestamp
    ///
    /// The eligibility gate applies on every call. The record keeps the
    /// homomorphic maximum of old and new; the timestamp refresh is
    /// unconditional. Eligibility is checked before any state is touched and
    /// every later step is infallible, so a submission either fully applies
    /// or leaves no trace.
    pub fn submit_at(
        &mut self,
        principal: Principal,
        ciphertext: Ciphertext,
        submitted_at: Timestamp,
    ) -> LedgerResult<()> {
        if !self.eligibility.is_eligible(&principal) {
            tracing::debug!(principal = %principal, "submission rejected: not eligible");
            return Err(LedgerError::NotEligible(principal));
        }

        let stored = match self.records.get_mut(&principal) {
            None => {
                self.records.insert(
                    principal,
                    ScoreRecord {
                        owner: principal,
                        ciphertext,
                        submitted_at,
                        exists: true,
                    },
                );
                self.order.push(principal);
                tracing::debug!(principal = %principal, "score record created");
                ciphertext
            }
            Some(record) => {
                let is_higher = self.coprocessor.greater_than(ciphertext, record.ciphertext);
                record.ciphertext = self.coprocessor.select(is_higher, ciphertext, record.ciphertext);
                record.submitted_at = submitted_at;
                tracing::debug!(principal = %principal, "score record updated");
                record.ciphertext
            }
        };

        if self.max.has_value() {
            self.max.fold(self.coprocessor.as_ref(), ciphertext);
        } else {
            self.max.initialize(ciphertext);
        }

        self.acl.grant(stored, self.authority);
        self.acl.grant(stored, principal);
        self.acl.grant(self.max.ciphertext(), self.authority);

        Ok(())
    }

    /// Look up a principal's record
    pub fn get(&self, principal: &Principal) -> Option<&ScoreRecord> {
        self.records.get(principal)
    }

    /// Records in first-submission order
    pub fn records_in_order(&self) -> impl Iterator<Item = &ScoreRecord> {
        self.order.iter().filter_map(|p| self.records.get(p))
    }

    /// Number of populated records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether any score has been submitted
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The running encrypted maximum
    pub fn max(&self) -> &MaxState {
        &self.max
    }

    /// The grant set, as consulted by the decryption oracle
    pub fn acl(&self) -> &AccessControl {
        &self.acl
    }

    /// Service identity receiving standing grants
    pub fn authority(&self) -> Principal {
        self.authority
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::InMemoryEligibility;
    use cipherboard_fhe::{AssetId, EncryptionProof, FheConfig, LocalCoprocessor};

    struct Fixture {
        coprocessor: Arc<LocalCoprocessor>,
        registry: Arc<InMemoryEligibility>,
        ledger: ScoreLedger,
    }

    fn fixture() -> Fixture {
        let coprocessor = Arc::new(LocalCoprocessor::new(FheConfig::random()));
        let registry = Arc::new(InMemoryEligibility::new());
        let ledger = ScoreLedger::new(
            coprocessor.clone(),
            registry.clone(),
            Principal::derive("authority"),
        );
        Fixture {
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
    fn test_ineligible_submission_rejected() {
        let mut fx = fixture();
        let alice = Principal::derive("alice");
        let ct = encrypt(&fx.coprocessor, 50);

        let result = fx.ledger.submit_at(alice, ct, Timestamp(1));
        assert!(matches!(result, Err(LedgerError::NotEligible(p)) if p == alice));
        assert!(fx.ledger.get(&alice).is_none());
        assert!(fx.ledger.is_empty());
        assert!(!fx.ledger.max().has_value());
    }

    #[test]
    fn test_first_submission_creates_record_and_max() {
        let mut fx = fixture();
        let alice = Principal::derive("alice");
        fx.registry.register(alice, AssetId(1));

        let ct = encrypt(&fx.coprocessor, 50);
        fx.ledger.submit_at(alice, ct, Timestamp(10)).unwrap();

        let record = fx.ledger.get(&alice).unwrap();
        assert!(record.exists);
        assert_eq!(record.owner, alice);
        assert_eq!(record.submitted_at, Timestamp(10));
        assert_eq!(fx.coprocessor.reveal(record.ciphertext), 50);

        assert!(fx.ledger.max().has_value());
        assert_eq!(fx.coprocessor.reveal(fx.ledger.max().ciphertext()), 50);
    }

    #[test]
    fn test_lower_resubmission_keeps_score_refreshes_timestamp() {
        let mut fx = fixture();
        let alice = Principal::derive("alice");
        fx.registry.register(alice, AssetId(1));

        let first = encrypt(&fx.coprocessor, 50);
        fx.ledger.submit_at(alice, first, Timestamp(10)).unwrap();
        let lower = encrypt(&fx.coprocessor, 30);
        fx.ledger.submit_at(alice, lower, Timestamp(20)).unwrap();

        let record = fx.ledger.get(&alice).unwrap();
        assert_eq!(fx.coprocessor.reveal(record.ciphertext), 50);
        assert_eq!(record.submitted_at, Timestamp(20));
    }

    #[test]
    fn test_higher_resubmission_raises_score() {
        let mut fx = fixture();
        let alice = Principal::derive("alice");
        fx.registry.register(alice, AssetId(1));

        fx.ledger
            .submit_at(alice, encrypt(&fx.coprocessor, 50), Timestamp(10))
            .unwrap();
        fx.ledger
            .submit_at(alice, encrypt(&fx.coprocessor, 90), Timestamp(20))
            .unwrap();

        let record = fx.ledger.get(&alice).unwrap();
        assert_eq!(fx.coprocessor.reveal(record.ciphertext), 90);
    }

    #[test]
    fn test_max_tracks_global_maximum_across_principals() {
        let mut fx = fixture();
        let alice = Principal::derive("alice");
        let bob = Principal::derive("bob");
        fx.registry.register(alice, AssetId(1));
        fx.registry.register(bob, AssetId(2));

        fx.ledger
            .submit_at(alice, encrypt(&fx.coprocessor, 50), Timestamp(10))
            .unwrap();
        fx.ledger
            .submit_at(bob, encrypt(&fx.coprocessor, 80), Timestamp(20))
            .unwrap();
        fx.ledger
            .submit_at(alice, encrypt(&fx.coprocessor, 60), Timestamp(30))
            .unwrap();

        assert_eq!(fx.coprocessor.reveal(fx.ledger.max().ciphertext()), 80);
    }

    #[test]
    fn test_grants_on_record_and_max() {
        let mut fx = fixture();
        let alice = Principal::derive("alice");
        fx.registry.register(alice, AssetId(1));

        fx.ledger
            .submit_at(alice, encrypt(&fx.coprocessor, 50), Timestamp(10))
            .unwrap();

        let authority = fx.ledger.authority();
        let record_ct = fx.ledger.get(&alice).unwrap().ciphertext;
        let max_ct = fx.ledger.max().ciphertext();

        assert!(fx.ledger.acl().is_granted(&record_ct, &alice));
        assert!(fx.ledger.acl().is_granted(&record_ct, &authority));
        assert!(fx.ledger.acl().is_granted(&max_ct, &authority));
    }

    #[test]
    fn test_one_record_per_principal() {
        let mut fx = fixture();
        let alice = Principal::derive("alice");
        fx.registry.register(alice, AssetId(1));

        for ts in 1..=5u64 {
            let ct = encrypt(&fx.coprocessor, ts as u32 * 10);
            fx.ledger.submit_at(alice, ct, Timestamp(ts)).unwrap();
        }
        assert_eq!(fx.ledger.len(), 1);
    }
}
