//! Memoized single-flight derivation session
//!
//! Argon2id is expensive, so one save session derives its stack exactly once:
//! the first `init_save` spawns the derivation and memoizes a shared handle;
//! callers arriving while it is in flight await the same handle instead of
//! re-deriving. The session is a three-state machine:
//!
//! ```text
//! Empty ──init_save──▶ Pending(shared) ──completion──▶ Ready(stack)
//!   ▲                        │                              │
//!   └────────────────────reset──────────────────────────────┘
//! ```
//!
//! `reset` only drops the reference. A derivation already running on the
//! blocking pool completes into an unobserved result and is discarded —
//! accepted wasted CPU, not a correctness problem, and deliberately not
//! "fixed" with cancellation.

use std::sync::{Arc, Mutex};

use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use tracing::debug;

use snip_core::{SnipError, SnipResult};
use snip_crypto::{generate_stack, CryptoStack};

// The error side must be Clone to travel through Shared; derivation failures
// are Derivation errors by construction, so a message string suffices.
type SharedStack = Shared<BoxFuture<'static, Result<Arc<CryptoStack>, String>>>;

enum SessionState {
    Empty,
    Pending(SharedStack),
    Ready(Arc<CryptoStack>),
}

pub struct CryptoSession {
    address_salt: String,
    state: Mutex<SessionState>,
}

impl CryptoSession {
    pub fn new(address_salt: impl Into<String>) -> Self {
        Self {
            address_salt: address_salt.into(),
            state: Mutex::new(SessionState::Empty),
        }
    }

    /// Start deriving a stack for this session if none is pending or ready.
    /// Repeated calls are no-ops sharing the in-flight derivation.
    pub fn init_save(&self, ephemeral: bool) {
        let mut state = self.state.lock().expect("session lock poisoned");
        if matches!(*state, SessionState::Empty) {
            debug!(ephemeral, "starting background stack derivation");
            *state = SessionState::Pending(spawn_derivation(ephemeral, &self.address_salt));
        }
    }

    /// Await the session's stack. Fails if `init_save` was never called (or
    /// the session was reset), or if the derivation itself failed.
    pub async fn await_stack(&self) -> SnipResult<Arc<CryptoStack>> {
        let pending = {
            let state = self.state.lock().expect("session lock poisoned");
            match &*state {
                SessionState::Empty => {
                    return Err(SnipError::Derivation(
                        "crypto session not initialised".into(),
                    ))
                }
                SessionState::Ready(stack) => return Ok(stack.clone()),
                SessionState::Pending(shared) => shared.clone(),
            }
        };

        match pending.clone().await {
            Ok(stack) => {
                let mut state = self.state.lock().expect("session lock poisoned");
                // Only promote if this is still the same in-flight derivation;
                // a reset (and possibly a new init) may have intervened.
                if let SessionState::Pending(current) = &*state {
                    if current.ptr_eq(&pending) {
                        *state = SessionState::Ready(stack.clone());
                    }
                }
                Ok(stack)
            }
            Err(message) => Err(SnipError::Derivation(message)),
        }
    }

    /// Discard the memoized stack, pending or resolved. In-flight KDF work is
    /// not interrupted; its result is simply never observed.
    pub fn reset(&self) {
        let mut state = self.state.lock().expect("session lock poisoned");
        if !matches!(*state, SessionState::Empty) {
            debug!("resetting crypto session");
        }
        *state = SessionState::Empty;
    }
}

fn spawn_derivation(ephemeral: bool, address_salt: &str) -> SharedStack {
    let salt = address_salt.to_string();
    // Spawned so the KDF runs regardless of whether anyone polls the shared
    // handle; dropping the handle detaches rather than cancels.
    let task = tokio::spawn(async move { generate_stack(ephemeral, &salt).await.map(Arc::new) });

    async move {
        match task.await {
            Ok(result) => result.map_err(|e| e.to_string()),
            Err(join_error) => Err(format!("derivation task failed: {join_error}")),
        }
    }
    .boxed()
    .shared()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS_SALT: &str = "test-deployment-salt";

    #[tokio::test]
    async fn test_await_without_init_fails() {
        let session = CryptoSession::new(ADDRESS_SALT);
        let err = session.await_stack().await.unwrap_err();
        assert!(matches!(err, SnipError::Derivation(_)));
    }

    #[tokio::test]
    async fn test_single_flight_shares_one_derivation() {
        let session = CryptoSession::new(ADDRESS_SALT);
        session.init_save(true);
        session.init_save(true); // no-op

        let first = session.await_stack().await.unwrap();
        let second = session.await_stack().await.unwrap();
        assert!(
            Arc::ptr_eq(&first, &second),
            "both awaits must observe the same derived stack"
        );
    }

    #[tokio::test]
    async fn test_reset_discards_the_stack() {
        let session = CryptoSession::new(ADDRESS_SALT);
        session.init_save(true);
        let before = session.await_stack().await.unwrap();

        session.reset();
        assert!(session.await_stack().await.is_err());

        session.init_save(false);
        let after = session.await_stack().await.unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_ne!(before.identifier, after.identifier);
    }
}
