//! Bearer-token authentication.
//!
//! Tokens are formatted as `rl_<actor_prefix><random>` and stored SHA-256
//! hashed; plaintext never touches the database. Resolution goes through the
//! [`TokenStore`] trait so the validator is backend-agnostic.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::{ActorContext, AuthError};
use crate::infra::TokenStore;

/// API token prefix
pub const TOKEN_PREFIX: &str = "rl_";

/// Generate a new API token for an actor.
///
/// Returns `(plaintext_token, token_hash)`. Only the hash is persisted.
pub fn generate_token(actor_id: &Uuid) -> (String, String) {
    use rand::Rng;
    let mut rng = rand::thread_rng();

    let random_bytes: [u8; 24] = rng.gen();
    let random_part = base64::Engine::encode(
        &base64::engine::general_purpose::URL_SAFE_NO_PAD,
        random_bytes,
    );

    let actor_prefix = &actor_id.simple().to_string()[..8];
    let plaintext = format!("{}{}{}", TOKEN_PREFIX, actor_prefix, random_part);
    let hash = hash_token(&plaintext);

    (plaintext, hash)
}

/// Hash a token for storage or lookup.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Resolves bearer tokens to actor contexts.
pub struct TokenValidator {
    store: Arc<dyn TokenStore>,
    /// Hash of the bootstrap super-admin token, if configured.
    bootstrap_hash: Option<String>,
}

impl TokenValidator {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            store,
            bootstrap_hash: None,
        }
    }

    /// Accept a fixed bootstrap token as super-admin. Used for initial
    /// setup before any real admin actor exists.
    pub fn with_bootstrap_token(mut self, token: &str) -> Self {
        self.bootstrap_hash = Some(hash_token(token));
        self
    }

    /// Validate a bearer token and resolve the actor behind it.
    ///
    /// Suspended actors resolve successfully; suspension is enforced by the
    /// policy gate, not here, so that reads can still be served.
    pub async fn validate(&self, token: &str) -> Result<ActorContext, AuthError> {
        let hash = hash_token(token);

        if let Some(bootstrap) = &self.bootstrap_hash {
            if &hash == bootstrap {
                return Ok(ActorContext::bootstrap_admin());
            }
        }

        if !token.starts_with(TOKEN_PREFIX) {
            return Err(AuthError::InvalidToken);
        }

        let actor = self
            .store
            .actor_for_token(&hash)
            .await
            .map_err(|e| AuthError::Store(e.to_string()))?
            .ok_or(AuthError::InvalidToken)?;

        Ok(ActorContext::from(&actor))
    }
}
