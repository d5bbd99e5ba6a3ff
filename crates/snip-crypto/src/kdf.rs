//! Dual-profile Argon2id derivation: one passphrase, two outputs
//!
//! | Profile | parallelism | memory  | iterations | salt                    |
//! |---------|-------------|---------|------------|-------------------------|
//! | Address | 12          | 32 MiB  | 32         | fixed, deployment-wide  |
//! | Key     | 16          | 64 MiB  | 12         | random 32 B, per object |
//!
//! The address digest is deterministic so the same passphrase always resolves
//! to one storage object without a directory service; a per-object salt there
//! would break lookup. The key profile costs more on purpose: the address is
//! recomputed on every load attempt, the key is the confidentiality boundary.
//! Both profiles are protocol constants; deriving with the wrong profile or
//! salt surfaces later as an AEAD tag mismatch, not as a KDF error.

use argon2::{Algorithm, Argon2, Params, Version};
use zeroize::Zeroize;

use snip_core::{SnipError, SnipResult};

use crate::{KEY_SIZE, SALT_SIZE};

/// A derived 256-bit encryption key. Zeroized on drop.
pub struct EncryptionKey {
    bytes: [u8; KEY_SIZE],
}

impl EncryptionKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for EncryptionKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

struct Profile {
    mem_cost_kib: u32,
    time_cost: u32,
    parallelism: u32,
}

const ADDRESS_PROFILE: Profile = Profile {
    mem_cost_kib: 32 * 1024,
    time_cost: 32,
    parallelism: 12,
};

const KEY_PROFILE: Profile = Profile {
    mem_cost_kib: 64 * 1024,
    time_cost: 12,
    parallelism: 16,
};

fn derive(passphrase: &str, salt: &[u8], profile: &Profile) -> SnipResult<[u8; KEY_SIZE]> {
    let params = Params::new(
        profile.mem_cost_kib,
        profile.time_cost,
        profile.parallelism,
        Some(KEY_SIZE),
    )
    .map_err(|e| SnipError::Derivation(format!("invalid Argon2id params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut out = [0u8; KEY_SIZE];
    argon2
        .hash_password_into(passphrase.as_bytes(), salt, &mut out)
        .map_err(|e| SnipError::Derivation(format!("Argon2id failed: {e}")))?;
    Ok(out)
}

/// Derive the deterministic storage address for an identifier, as a hex digest.
///
/// `address_salt` is the deployment-wide constant from configuration.
pub fn derive_address(identifier: &str, address_salt: &[u8]) -> SnipResult<String> {
    let digest = derive(identifier, address_salt, &ADDRESS_PROFILE)?;
    Ok(hex::encode(digest))
}

/// Derive the per-object encryption key from an identifier and the object's
/// random salt (generated on save, carried in the envelope on load).
pub fn derive_key(identifier: &str, key_salt: &[u8; SALT_SIZE]) -> SnipResult<EncryptionKey> {
    let bytes = derive(identifier, key_salt, &KEY_PROFILE)?;
    Ok(EncryptionKey::from_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::generate_nonce_material;

    const TEST_ADDRESS_SALT: &[u8] = b"test-deployment-salt";

    #[test]
    fn test_address_is_deterministic() {
        let a1 = derive_address("AliceBob", TEST_ADDRESS_SALT).unwrap();
        let a2 = derive_address("AliceBob", TEST_ADDRESS_SALT).unwrap();
        assert_eq!(a1, a2, "same identifier and salt must resolve to one address");
        assert_eq!(a1.len(), KEY_SIZE * 2, "address is a hex digest of 32 bytes");
        assert!(a1.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_keys_differ_under_independent_salts() {
        let salt1 = generate_nonce_material();
        let salt2 = generate_nonce_material();
        assert_ne!(salt1, salt2);

        let k1 = derive_key("AliceBob", &salt1).unwrap();
        let k2 = derive_key("AliceBob", &salt2).unwrap();
        assert_ne!(
            k1.as_bytes(),
            k2.as_bytes(),
            "fresh salts must decorrelate keys for a reused passphrase"
        );
    }

    #[test]
    fn test_debug_redacts_key_material() {
        let key = EncryptionKey::from_bytes([7u8; KEY_SIZE]);
        let rendered = format!("{key:?}");
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains('7'));
    }
}
