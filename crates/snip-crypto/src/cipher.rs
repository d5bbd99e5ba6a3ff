//! Versioned AEAD envelope: seal and open
//!
//! v2 framing (written by this client):
//! ```text
//! data' = base64url_nopad(zlib(data))
//! plaintext = JSON({metadata, data'})
//! envelope = { version: "v2", keysalt, initvector, ciphertext: AES-256-GCM(plaintext), ephemeral }
//! ```
//!
//! v1 framing (legacy, read-only): the sealed plaintext is `zlib(JSON(snippet))`
//! with no inner encoding of `data`.
//!
//! The cipher is AES-256-GCM with the envelope's full 32-byte init vector as
//! the nonce and no AAD. A tag mismatch fails the whole open — wrong key,
//! wrong nonce, and tampered ciphertext are indistinguishable by design.

use aes_gcm::{
    aead::{consts::U32, Aead, KeyInit},
    aes::Aes256,
    AesGcm, Nonce,
};

use snip_core::{SnipError, SnipResult, SnippetModel, SnippetSpec, SpecVersion};

use crate::codec;
use crate::kdf::{self, EncryptionKey};
use crate::stack::CryptoStack;
use crate::{IV_SIZE, SALT_SIZE};

/// AES-256-GCM parameterized over the protocol's 32-byte nonce. Non-96-bit
/// nonces are processed through GHASH per NIST SP 800-38D, matching what the
/// envelopes' original producers did.
type WideNonceGcm = AesGcm<Aes256, U32>;

/// Seal a snippet under a freshly derived stack, producing a v2 envelope.
///
/// The stack's `key_salt`/`init_vector` are embedded verbatim; they must be
/// the exact bytes the key was derived with and the nonce used here, or the
/// envelope can never be opened.
pub fn encrypt_snippet(stack: &CryptoStack, snippet: &SnippetModel) -> SnipResult<SnippetSpec> {
    let mut framed = snippet.clone();
    framed.data = b64_encode(&codec::compress(&snippet.data)?);

    let plaintext = serde_json::to_vec(&framed)?;

    let cipher = WideNonceGcm::new(stack.encryption_key.as_bytes().into());
    let nonce = Nonce::<U32>::from_slice(&stack.init_vector);
    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_ref())
        .map_err(|_| SnipError::Encoding("AES-GCM seal failed".into()))?;

    Ok(SnippetSpec {
        version: SpecVersion::V2.as_wire().to_string(),
        keysalt: b64_encode(&stack.key_salt),
        initvector: b64_encode(&stack.init_vector),
        ciphertext: b64_encode(&ciphertext),
        ephemeral: snippet.metadata.ephemeral,
    })
}

/// Open an envelope with the passphrase identifier, re-deriving the key from
/// the envelope's salt. This is the expensive path (one Key-profile Argon2id
/// call); see [`open_envelope`] when the key is already in hand.
pub fn decrypt_snippet(
    spec: &SnippetSpec,
    identifier: &str,
    version: SpecVersion,
) -> SnipResult<SnippetModel> {
    let keysalt: [u8; SALT_SIZE] = b64_decode(&spec.keysalt)?
        .try_into()
        .map_err(|_| SnipError::Encoding("keysalt is not 32 bytes".into()))?;

    let key = kdf::derive_key(identifier, &keysalt)?;
    open_envelope(spec, &key, version)
}

/// Open an envelope with an already-derived key.
pub fn open_envelope(
    spec: &SnippetSpec,
    key: &EncryptionKey,
    version: SpecVersion,
) -> SnipResult<SnippetModel> {
    let iv = b64_decode(&spec.initvector)?;
    if iv.len() != IV_SIZE {
        return Err(SnipError::Encoding(format!(
            "init vector is {} bytes, expected {IV_SIZE}",
            iv.len()
        )));
    }
    let ciphertext = b64_decode(&spec.ciphertext)?;

    let cipher = WideNonceGcm::new(key.as_bytes().into());
    let nonce = Nonce::<U32>::from_slice(&iv);
    let plaintext = cipher
        .decrypt(nonce, ciphertext.as_ref())
        .map_err(|_| SnipError::Authentication)?;

    match version {
        SpecVersion::V1 => {
            // Legacy framing: the whole serialized snippet was compressed.
            let serialized = codec::decompress_bytes(&plaintext)?;
            Ok(serde_json::from_slice(&serialized)?)
        }
        SpecVersion::V2 => {
            let mut snippet: SnippetModel = serde_json::from_slice(&plaintext)?;
            snippet.data = codec::decompress(&b64_decode(&snippet.data)?)?;
            Ok(snippet)
        }
    }
}

fn b64_encode(data: &[u8]) -> String {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    URL_SAFE_NO_PAD.encode(data)
}

fn b64_decode(s: &str) -> SnipResult<Vec<u8>> {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    URL_SAFE_NO_PAD
        .decode(s)
        .map_err(|e| SnipError::Encoding(format!("base64: {e}")))
}
