//! In-memory doubles shared by the unit tests in this crate.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chatgate_types::error::{SendError, StoreError};
use chatgate_types::session::SessionState;

use crate::backend::ChatTransport;
use crate::session::SessionRepository;

/// Transport that records every delivered message.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    sent: Arc<Mutex<Vec<(String, String)>>>,
    fail_next: Arc<AtomicBool>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next send return a transport error.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|(_, text)| text).collect()
    }
}

impl ChatTransport for RecordingTransport {
    async fn send_text(&self, thread_id: &str, text: &str) -> Result<(), SendError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(SendError::Transport("connection reset".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((thread_id.to_string(), text.to_string()));
        Ok(())
    }
}

/// Session repository backed by a shared in-memory slot.
#[derive(Clone, Default)]
pub struct MemorySessionRepository {
    slot: Arc<Mutex<Option<SessionState>>>,
    saves: Arc<AtomicUsize>,
    fail_loads: Arc<AtomicBool>,
    fail_saves: Arc<AtomicBool>,
}

impl MemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: SessionState) -> Self {
        let repo = Self::new();
        *repo.slot.lock().unwrap() = Some(state);
        repo
    }

    pub fn fail_loads(&self) {
        self.fail_loads.store(true, Ordering::SeqCst);
    }

    pub fn fail_saves(&self) {
        self.fail_saves.store(true, Ordering::SeqCst);
    }

    pub fn saved(&self) -> Option<SessionState> {
        self.slot.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl SessionRepository for MemorySessionRepository {
    fn location(&self) -> String {
        "memory".to_string()
    }

    async fn load(&self) -> Result<Option<SessionState>, StoreError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(StoreError::Io(std::io::Error::other("corrupt")));
        }
        Ok(self.slot.lock().unwrap().clone())
    }

    async fn save(&self, state: &SessionState) -> Result<(), StoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Io(std::io::Error::other("read-only filesystem")));
        }
        *self.slot.lock().unwrap() = Some(state.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
