//! snip-crypto: client-side sealing for passphrase-addressed snippets
//!
//! Save pipeline: passphrase → Argon2id (address + key, concurrently) →
//! zlib compress → AES-256-GCM seal → versioned envelope → upload
//!
//! Derivation is dual-profile: the same passphrase feeds two independent
//! Argon2id configurations, one cheap and fixed-salt for the deterministic
//! storage address, one expensive and random-salt for the encryption key.
//! The passphrase is the system's only secret; the storage backend is
//! untrusted for confidentiality.

pub mod cipher;
pub mod codec;
pub mod kdf;
pub mod passphrase;
pub mod stack;

pub use cipher::{decrypt_snippet, encrypt_snippet};
pub use kdf::{derive_address, derive_key, EncryptionKey};
pub use passphrase::generate as generate_passphrase;
pub use stack::{generate_stack, CryptoStack};

/// Size of an encryption key in bytes (256-bit)
pub const KEY_SIZE: usize = 32;

/// Size of the per-object key-derivation salt
pub const SALT_SIZE: usize = 32;

/// Size of the AES-GCM initialization vector carried in the envelope.
/// Wider than the customary 96 bits; see `stack::generate_nonce_material`.
pub const IV_SIZE: usize = 32;

/// Size of the GCM authentication tag
pub const TAG_SIZE: usize = 16;
