//! snip-transport: moving sealed envelopes to and from untrusted storage
//!
//! Save: session derives a stack in the background → seal → POST to the API.
//! Load: classify the identifier → derive the address → GET from the object
//! store → open. The store never sees key material; it holds only the
//! envelope, and the `Ephemeral` upload header that mirrors the envelope's
//! lifetime flag for backend expiry policy.

pub mod client;
pub mod service;
pub mod session;

pub use client::SnippetStore;
pub use service::E2eService;
pub use session::CryptoSession;
