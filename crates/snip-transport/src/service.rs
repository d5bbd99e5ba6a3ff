//! End-to-end save/load flows
//!
//! The service owns one [`CryptoSession`] and one [`SnippetStore`]. A save
//! consumes the session's stack for exactly one seal and then discards it,
//! so no key or nonce ever covers two objects. A load never touches the
//! session: it re-derives everything it needs from the identifier and the
//! fetched envelope.

use tokio::task;
use tracing::{debug, info, instrument};

use snip_core::config::SnipConfig;
use snip_core::types::resolve_storage_path;
use snip_core::{SnipError, SnipResult, SnippetModel, SnippetType, SpecVersion};
use snip_crypto::{decrypt_snippet, derive_address, encrypt_snippet};

use crate::client::SnippetStore;
use crate::session::CryptoSession;

pub struct E2eService {
    store: SnippetStore,
    session: CryptoSession,
    address_salt: String,
}

impl E2eService {
    pub fn new(config: &SnipConfig) -> Self {
        Self {
            store: SnippetStore::new(
                &config.service.api_base_url,
                &config.service.storage_base_url,
            ),
            session: CryptoSession::new(config.crypto.address_salt.clone()),
            address_salt: config.crypto.address_salt.clone(),
        }
    }

    /// Begin deriving key material for an upcoming save. Safe to call early
    /// and often; the expensive work happens once per session.
    pub fn init_save(&self, ephemeral: bool) {
        self.session.init_save(ephemeral);
    }

    /// Invalidate the current session, e.g. after toggling the ephemeral
    /// choice or starting a fresh edit.
    pub fn reset(&self) {
        self.session.reset();
    }

    /// Seal and upload a snippet. Returns the passphrase identifier, the
    /// only handle that can ever recover the snippet.
    ///
    /// Requires a prior [`init_save`](Self::init_save); the stack it derived
    /// is consumed here and the session returns to empty.
    #[instrument(skip_all)]
    pub async fn save(&self, mut snippet: SnippetModel) -> SnipResult<String> {
        let stack = self.session.await_stack().await?;

        snippet.metadata.id = stack.identifier.clone();
        debug!("sealing snippet");
        let spec = encrypt_snippet(&stack, &snippet)?;

        self.store.put_envelope(&stack.address, &spec).await?;

        // One stack, one seal: drop the session so nothing can reuse the
        // key/nonce pair for a second object.
        self.session.reset();

        info!(ephemeral = spec.ephemeral, "snippet saved");
        Ok(stack.identifier.clone())
    }

    /// Fetch and open the snippet a passphrase identifier points at.
    #[instrument(skip_all, fields(identifier_len = identifier.len()))]
    pub async fn load(&self, identifier: &str) -> SnipResult<SnippetModel> {
        // Classification failures abort here, before derivation or network.
        if SnippetType::classify(identifier) == SnippetType::Invalid {
            let caps = identifier
                .chars()
                .filter(|c| c.is_ascii_uppercase())
                .count();
            return Err(SnipError::Classification(caps));
        }

        debug!("deriving storage address");
        let id = identifier.to_string();
        let salt = self.address_salt.clone();
        let address = task::spawn_blocking(move || derive_address(&id, salt.as_bytes()))
            .await
            .map_err(|e| SnipError::Derivation(format!("derivation task failed: {e}")))??;

        let storage_path = resolve_storage_path(identifier, &address)?;
        let spec = self.store.get_envelope(&storage_path).await?;

        let version = SpecVersion::from_wire(&spec.version);
        debug!(version = version.as_wire(), "opening envelope");

        let id = identifier.to_string();
        let snippet = task::spawn_blocking(move || decrypt_snippet(&spec, &id, version))
            .await
            .map_err(|e| SnipError::Derivation(format!("derivation task failed: {e}")))??;

        info!("snippet loaded");
        Ok(snippet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unroutable_service() -> E2eService {
        // Nothing listens here; any network attempt would surface as a
        // Transport error, which is exactly what the tests rule out.
        let mut config = SnipConfig::default();
        config.service.api_base_url = "http://127.0.0.1:1".into();
        config.service.storage_base_url = "http://127.0.0.1:1".into();
        config.crypto.address_salt = "test-deployment-salt".into();
        E2eService::new(&config)
    }

    #[tokio::test]
    async fn test_invalid_identifier_aborts_before_network() {
        let service = unroutable_service();
        let err = service.load("alicebob").await.unwrap_err();
        assert!(
            matches!(err, SnipError::Classification(0)),
            "expected a classification error, got: {err}"
        );
    }

    #[tokio::test]
    async fn test_four_caps_identifier_aborts_before_network() {
        let service = unroutable_service();
        let err = service.load("AliceBobCarolDave").await.unwrap_err();
        assert!(matches!(err, SnipError::Classification(4)));
    }

    #[tokio::test]
    async fn test_save_without_init_is_rejected() {
        let service = unroutable_service();
        let snippet = SnippetModel {
            metadata: snip_core::SnippetMetadata {
                id: String::new(),
                language: "plaintext".into(),
                ephemeral: true,
            },
            data: "hello".into(),
        };
        let err = service.save(snippet).await.unwrap_err();
        assert!(matches!(err, SnipError::Derivation(_)));
    }
}
