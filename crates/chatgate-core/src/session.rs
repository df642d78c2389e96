//! Session state store.
//!
//! `SessionStore` owns the in-memory `SessionState` and writes it through a
//! `SessionRepository` after every processed message. Implementations of the
//! repository live in chatgate-infra.

use std::future::Future;

use chatgate_types::error::StoreError;
use chatgate_types::session::SessionState;
use tracing::{debug, info, warn};

/// Persistence port for the session state blob.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait SessionRepository: Send + Sync {
    /// Where the state lives, for log lines (e.g. a file path).
    fn location(&self) -> String;

    /// Read the persisted state. `Ok(None)` means nothing has been saved yet.
    fn load(&self) -> impl Future<Output = Result<Option<SessionState>, StoreError>> + Send;

    /// Overwrite the persisted state with `state`.
    fn save(&self, state: &SessionState) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Write-through owner of the shared session state.
pub struct SessionStore<R> {
    repo: R,
    state: SessionState,
}

impl<R: SessionRepository> SessionStore<R> {
    /// Load the persisted state, falling back to an empty state.
    ///
    /// A missing or unreadable backing store is not fatal: the store starts
    /// empty and the next `persist` recreates it.
    pub async fn load(repo: R) -> Self {
        let state = match repo.load().await {
            Ok(Some(state)) => {
                info!(location = %repo.location(), keys = state.len(), "session state loaded");
                state
            }
            Ok(None) => {
                warn!(location = %repo.location(), "no session state found, starting empty");
                SessionState::new()
            }
            Err(e) => {
                warn!(location = %repo.location(), error = %e, "error loading session state, starting empty");
                SessionState::new()
            }
        };
        Self { repo, state }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    /// Serialise the current state and overwrite the backing store.
    ///
    /// Failures are logged here as well as returned, so callers that only
    /// need best-effort persistence can ignore the result.
    pub async fn persist(&self) -> Result<(), StoreError> {
        match self.repo.save(&self.state).await {
            Ok(()) => {
                debug!(location = %self.repo.location(), keys = self.state.len(), "session state saved");
                Ok(())
            }
            Err(e) => {
                warn!(location = %self.repo.location(), error = %e, "error saving session state");
                Err(e)
            }
        }
    }
}

impl<R> std::fmt::Debug for SessionStore<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("keys", &self.state.len())
            .finish_non_exhaustive()
    }
}
