//! Local signature ceremony
//!
//! In production the authorization message goes to the user's wallet, which
//! may decline. Local mode has no wallet, so this signer approves every
//! ceremony, binding the signature to the identity and message digest.

use async_trait::async_trait;
use cipherboard_client::{AuthorizationMessage, SessionResult, SessionSigner};
use cipherboard_fhe::Principal;

/// Auto-approving stand-in for the wallet ceremony
pub struct LocalSigner;

#[async_trait]
impl SessionSigner for LocalSigner {
    async fn sign_authorization(
        &self,
        identity: Principal,
        message: &AuthorizationMessage,
    ) -> SessionResult<Vec<u8>> {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"cipherboard_local_signer");
        hasher.update(identity.as_bytes());
        hasher.update(&message.digest());
        Ok(hasher.finalize().as_bytes().to_vec())
    }
}
