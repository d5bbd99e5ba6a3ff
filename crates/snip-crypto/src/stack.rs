//! Per-save derivation of the full crypto stack
//!
//! A `CryptoStack` is created once per save or load attempt, consumed by
//! exactly one seal/open call, and dropped. It is never persisted and never
//! shared across attempts: every save draws a fresh `key_salt`/`init_vector`
//! pair, so ciphertexts stay unique even when a passphrase is reused.

use tracing::debug;
use uuid::Uuid;

use snip_core::SnipResult;

use crate::kdf::{self, EncryptionKey};
use crate::passphrase;
use crate::{IV_SIZE, SALT_SIZE};

/// Ephemeral, in-memory derivation result owned by a single attempt.
#[derive(Debug)]
pub struct CryptoStack {
    /// The generated passphrase identifier (the user-facing secret).
    pub identifier: String,
    /// Deterministic storage address, hex.
    pub address: String,
    /// AES-256 key from the Key profile.
    pub encryption_key: EncryptionKey,
    /// Random per-object salt the key was derived with.
    pub key_salt: [u8; SALT_SIZE],
    /// AES-GCM nonce for the single seal call.
    pub init_vector: [u8; IV_SIZE],
}

/// Produce 32 bytes of nonce/salt material.
///
/// Deployed envelopes carry the text encoding of a random v4 UUID truncated
/// to 32 bytes, both as the KDF salt and as the GCM nonce, so that exact
/// routine is kept: changing it (or the 32-byte nonce width) would strand
/// every stored snippet. `key_salt` and `init_vector` are two independent
/// invocations, never one shared draw.
// TODO: switch to 32 raw random bytes once a v3 envelope migration exists.
pub fn generate_nonce_material() -> [u8; 32] {
    let text = Uuid::new_v4().to_string();
    let mut out = [0u8; 32];
    out.copy_from_slice(&text.as_bytes()[..32]);
    out
}

/// Generate a passphrase and derive the complete stack for one save attempt.
///
/// The two Argon2id profiles are independent, so they run concurrently on
/// blocking threads; neither blocks the async scheduler. Ephemeral snippets
/// get a 2-word identifier, prolonged ones 3 words.
pub async fn generate_stack(ephemeral: bool, address_salt: &str) -> SnipResult<CryptoStack> {
    let word_count = if ephemeral { 2 } else { 3 };
    let identifier = passphrase::generate(word_count);

    let key_salt = generate_nonce_material();
    let init_vector = generate_nonce_material();

    debug!(word_count, "deriving crypto stack");

    let id_for_address = identifier.clone();
    let salt_for_address = address_salt.as_bytes().to_vec();
    let address_task = tokio::task::spawn_blocking(move || {
        kdf::derive_address(&id_for_address, &salt_for_address)
    });

    let id_for_key = identifier.clone();
    let key_task =
        tokio::task::spawn_blocking(move || kdf::derive_key(&id_for_key, &key_salt));

    let (address, encryption_key) = tokio::try_join!(address_task, key_task)
        .map_err(|e| snip_core::SnipError::Derivation(format!("derivation task failed: {e}")))?;

    Ok(CryptoStack {
        identifier,
        address: address?,
        encryption_key: encryption_key?,
        key_salt,
        init_vector,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use snip_core::SnippetType;

    #[test]
    fn test_nonce_material_is_fresh_per_call() {
        let a = generate_nonce_material();
        let b = generate_nonce_material();
        assert_ne!(a, b);
    }

    #[test]
    fn test_nonce_material_is_uuid_text() {
        let material = generate_nonce_material();
        // Hyphenated v4 UUID text: hex digits and dashes only.
        assert!(material
            .iter()
            .all(|&b| b == b'-' || (b as char).is_ascii_hexdigit()));
    }

    #[tokio::test]
    async fn test_generated_stack_shape() {
        let stack = generate_stack(true, "test-deployment-salt").await.unwrap();

        assert_eq!(
            SnippetType::classify(&stack.identifier),
            SnippetType::Ephemeral
        );
        assert_eq!(stack.address.len(), 64);
        assert_ne!(stack.key_salt, stack.init_vector);
    }
}
