use thiserror::Error;

pub type SnipResult<T> = Result<T, SnipError>;

/// Failure taxonomy for the save/load protocol.
///
/// `Authentication` is deliberately separate from `Transport`: a tag mismatch
/// means a wrong passphrase or corrupted ciphertext, while `NotFound` means the
/// object does not exist at the derived address. Nothing here is retried
/// internally; callers re-invoke the whole flow if they want another attempt.
#[derive(Debug, Error)]
pub enum SnipError {
    #[error("identifier has {0} uppercase characters, which maps to no snippet type")]
    Classification(usize),

    #[error("key derivation failed: {0}")]
    Derivation(String),

    #[error("authenticated decryption failed: wrong passphrase or corrupted snippet")]
    Authentication,

    #[error("no snippet stored at {0}")]
    NotFound(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("envelope encoding error: {0}")]
    Encoding(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<serde_json::Error> for SnipError {
    fn from(e: serde_json::Error) -> Self {
        SnipError::Encoding(format!("JSON: {e}"))
    }
}
