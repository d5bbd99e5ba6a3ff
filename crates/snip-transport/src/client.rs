//! HTTP client for the envelope endpoints
//!
//! Uploads go through the API (`POST {api_base}/e2e/{address}`); downloads
//! come straight off the object store (`GET {storage_base}/{prefix}/{address}`).
//! Not-found and forbidden statuses are reported as `NotFound` so the caller
//! can distinguish "no such snippet" from a broken network. No retries,
//! no timeouts: a failed attempt is terminal and the caller re-invokes the
//! whole flow if it wants another try.

use tracing::debug;

use snip_core::{SnipError, SnipResult, SnippetSpec};

pub struct SnippetStore {
    http: reqwest::Client,
    api_base: String,
    storage_base: String,
}

impl SnippetStore {
    pub fn new(api_base: &str, storage_base: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            storage_base: storage_base.trim_end_matches('/').to_string(),
        }
    }

    fn upload_url(&self, address: &str) -> String {
        format!("{}/e2e/{}", self.api_base, address)
    }

    fn object_url(&self, storage_path: &str) -> String {
        format!("{}/{}", self.storage_base, storage_path)
    }

    /// Upload an envelope to its derived address. The `Ephemeral` header
    /// mirrors the envelope field so the backend can apply expiry policy
    /// without opening the JSON body.
    pub async fn put_envelope(&self, address: &str, spec: &SnippetSpec) -> SnipResult<()> {
        let url = self.upload_url(address);
        debug!(%url, ephemeral = spec.ephemeral, "uploading envelope");

        let response = self
            .http
            .post(&url)
            .header("Ephemeral", if spec.ephemeral { "true" } else { "false" })
            .json(spec)
            .send()
            .await
            .map_err(|e| SnipError::Transport(format!("upload: {e}")))?;

        check_status(response.status(), address)?;
        Ok(())
    }

    /// Fetch the envelope stored at a typed path (`{prefix}/{address}`).
    pub async fn get_envelope(&self, storage_path: &str) -> SnipResult<SnippetSpec> {
        let url = self.object_url(storage_path);
        debug!(%url, "downloading envelope");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| SnipError::Transport(format!("download: {e}")))?;

        check_status(response.status(), storage_path)?;

        response
            .json::<SnippetSpec>()
            .await
            .map_err(|e| SnipError::Encoding(format!("envelope body: {e}")))
    }
}

fn check_status(status: reqwest::StatusCode, what: &str) -> SnipResult<()> {
    use reqwest::StatusCode;
    if status.is_success() {
        return Ok(());
    }
    match status {
        StatusCode::NOT_FOUND | StatusCode::FORBIDDEN => Err(SnipError::NotFound(what.to_string())),
        other => Err(SnipError::Transport(format!(
            "storage backend returned {other} for {what}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_shapes() {
        let store = SnippetStore::new("https://api.example.com/", "https://cdn.example.com");
        assert_eq!(
            store.upload_url("abc123"),
            "https://api.example.com/e2e/abc123"
        );
        assert_eq!(
            store.object_url("ephemeral/abc123"),
            "https://cdn.example.com/ephemeral/abc123"
        );
    }

    #[test]
    fn test_status_mapping() {
        use reqwest::StatusCode;
        assert!(check_status(StatusCode::OK, "x").is_ok());
        assert!(check_status(StatusCode::CREATED, "x").is_ok());
        assert!(matches!(
            check_status(StatusCode::NOT_FOUND, "x"),
            Err(SnipError::NotFound(_))
        ));
        assert!(matches!(
            check_status(StatusCode::FORBIDDEN, "x"),
            Err(SnipError::NotFound(_))
        ));
        assert!(matches!(
            check_status(StatusCode::INTERNAL_SERVER_ERROR, "x"),
            Err(SnipError::Transport(_))
        ));
    }
}
