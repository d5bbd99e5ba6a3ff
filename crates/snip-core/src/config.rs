use serde::{Deserialize, Serialize};

/// Top-level client configuration (loaded from snip.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SnipConfig {
    pub service: ServiceConfig,
    pub crypto: CryptoConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// API endpoint envelopes are uploaded to (POST {api_base_url}/e2e/{address})
    pub api_base_url: String,
    /// Object-store endpoint envelopes are fetched from (GET {storage_base_url}/{prefix}/{address})
    pub storage_base_url: String,
    /// Log level (default: info)
    pub log_level: String,
    /// Log format: "json" or "text"
    pub log_format: String,
}

/// Derivation configuration.
///
/// The Argon2id profiles themselves are protocol constants and not
/// configurable: changing them would silently orphan every stored snippet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoConfig {
    /// Deployment-wide salt for address derivation. Must be identical for
    /// every client of a deployment, or the same passphrase stops resolving
    /// to one object. At least 8 bytes (Argon2 minimum).
    pub address_salt: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.snipcrypt.dev".into(),
            storage_base_url: "https://snippets.snipcrypt.dev".into(),
            log_level: "info".into(),
            log_format: "text".into(),
        }
    }
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            address_salt: "snipcrypt-public-address-salt".into(),
        }
    }
}
