//! Running encrypted maximum
//!
//! Folds every submitted ciphertext into a single handle whose plaintext is
//! the global maximum. The fold runs in ciphertext space, so the identity of
//! the current maximum-holder is not derivable from this structure. That is
//! a deliberate limitation: resolving "who holds the maximum" requires an
//! out-of-band decrypt-and-compare pass by a consumer holding grants on the
//! candidate scores. Do not leak owner identity here to close that gap.

use cipherboard_fhe::{Ciphertext, Coprocessor};

/// Singleton running-maximum state, owned by the ledger instance
#[derive(Clone, Copy, Debug)]
pub struct MaxState {
    ciphertext: Ciphertext,
    has_value: bool,
}

impl MaxState {
    /// Empty state; the ledger initializes it on the first submission
    pub fn new() -> Self {
        Self {
            ciphertext: Ciphertext::ZERO,
            has_value: false,
        }
    }

    /// Seed with the first submitted ciphertext
    pub fn initialize(&mut self, ciphertext: Ciphertext) {
        self.ciphertext = ciphertext;
        self.has_value = true;
    }

    /// Fold a submission in: keep whichever of (submitted, current) is
    /// larger, decided homomorphically. Monotone non-decreasing in plaintext,
    /// order-independent because max is commutative and associative.
    pub fn fold(&mut self, coprocessor: &dyn Coprocessor, submitted: Ciphertext) {
        let is_new_max = coprocessor.greater_than(submitted, self.ciphertext);
        self.ciphertext = coprocessor.select(is_new_max, submitted, self.ciphertext);
    }

    /// Handle of the current maximum (the zero sentinel before any submission)
    pub fn ciphertext(&self) -> Ciphertext {
        self.ciphertext
    }

    /// Whether any submission has been folded in
    pub fn has_value(&self) -> bool {
        self.has_value
    }
}

impl Default for MaxState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cipherboard_fhe::{EncryptionProof, FheConfig, LocalCoprocessor};

    fn encrypt(cp: &LocalCoprocessor, value: u32) -> Ciphertext {
        let raw = value.to_le_bytes();
        cp.encrypt_external(&raw, &EncryptionProof::prove(&raw))
            .unwrap()
    }

    #[test]
    fn test_fold_keeps_maximum() {
        let cp = LocalCoprocessor::new(FheConfig::random());
        let mut max = MaxState::new();

        max.initialize(encrypt(&cp, 50));
        max.fold(&cp, encrypt(&cp, 30));
        assert_eq!(cp.reveal(max.ciphertext()), 50);

        max.fold(&cp, encrypt(&cp, 80));
        assert_eq!(cp.reveal(max.ciphertext()), 80);
    }

    #[test]
    fn test_fold_is_order_independent() {
        let cp = LocalCoprocessor::new(FheConfig::random());
        let values = [12u32, 99, 7, 54];

        let mut forward = MaxState::new();
        forward.initialize(encrypt(&cp, values[0]));
        for &v in &values[1..] {
            forward.fold(&cp, encrypt(&cp, v));
        }

        let mut backward = MaxState::new();
        backward.initialize(encrypt(&cp, values[3]));
        for &v in values[..3].iter().rev() {
            backward.fold(&cp, encrypt(&cp, v));
        }

        assert_eq!(cp.reveal(forward.ciphertext()), 99);
        assert_eq!(cp.reveal(backward.ciphertext()), 99);
    }
}
