use serde::{Deserialize, Serialize};

use crate::error::{SnipError, SnipResult};

/// A snippet as the author sees it: text plus a little metadata.
///
/// This is the plaintext the protocol protects. On the v2 wire framing the
/// `data` field is replaced by its compressed, base64-encoded form before the
/// whole model is serialized and sealed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetModel {
    pub metadata: SnippetMetadata,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetMetadata {
    /// The passphrase identifier the snippet was saved under.
    pub id: String,
    /// Syntax-highlighting hint, e.g. "plaintext" or "rust".
    pub language: String,
    pub ephemeral: bool,
}

/// The wire envelope stored at the derived address.
///
/// All binary fields are base64 URL-safe without padding. `keysalt` and
/// `initvector` must be the exact bytes used by the matching seal call; any
/// mismatch fails authenticated decryption closed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnippetSpec {
    pub version: String,
    pub keysalt: String,
    pub initvector: String,
    pub ciphertext: String,
    pub ephemeral: bool,
}

/// Envelope framing version.
///
/// The wire field is free-form text; anything that is not exactly `"v2"` is
/// treated as v1. That fallback is how deployed clients behave, so unknown
/// future version strings land on the legacy arm rather than erroring out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecVersion {
    /// Legacy framing: the sealed plaintext is the deflate-compressed
    /// serialized snippet, with no inner encoding of `data`.
    V1,
    /// Current framing: `data` is compressed and base64-encoded inside the
    /// serialized snippet before sealing.
    V2,
}

impl SpecVersion {
    pub fn from_wire(version: &str) -> Self {
        match version {
            "v2" => SpecVersion::V2,
            _ => SpecVersion::V1,
        }
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            SpecVersion::V1 => "v1",
            SpecVersion::V2 => "v2",
        }
    }
}

/// Lifetime class of a snippet, encoded in the shape of its identifier.
///
/// The identifier is N concatenated capitalized words, so the number of
/// uppercase characters equals N. The class is derived from the text alone
/// and is never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnippetType {
    Static,
    Ephemeral,
    Prolonged,
    Invalid,
}

impl SnippetType {
    /// Classify an identifier by counting its uppercase characters.
    pub fn classify(identifier: &str) -> Self {
        match identifier.chars().filter(|c| c.is_ascii_uppercase()).count() {
            1 => SnippetType::Static,
            2 => SnippetType::Ephemeral,
            3 => SnippetType::Prolonged,
            _ => SnippetType::Invalid,
        }
    }

    /// Object-store prefix for this class.
    pub fn storage_prefix(&self) -> Option<&'static str> {
        match self {
            SnippetType::Static => Some("static"),
            SnippetType::Ephemeral => Some("ephemeral"),
            SnippetType::Prolonged => Some("prolonged"),
            SnippetType::Invalid => None,
        }
    }
}

/// Resolve the storage key for an address, or fail before any network access
/// if the identifier's shape is unclassifiable.
pub fn resolve_storage_path(identifier: &str, address: &str) -> SnipResult<String> {
    let kind = SnippetType::classify(identifier);
    match kind.storage_prefix() {
        Some(prefix) => Ok(format!("{prefix}/{address}")),
        None => {
            let caps = identifier.chars().filter(|c| c.is_ascii_uppercase()).count();
            Err(SnipError::Classification(caps))
        }
    }
}
