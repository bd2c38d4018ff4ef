//! Form inputs and self-clearing output messages.

use super::currency::CurrencyCode;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// A single-line text input.
#[derive(Debug, Clone, Default)]
pub struct FormField {
    value: String,
}

impl FormField {
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// The field read as a currency code, `None` when blank.
    pub fn currency(&self) -> Option<CurrencyCode> {
        CurrencyCode::parse(&self.value)
    }
}

// Stand-in deadline for TTLs too large to add to the clock
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

#[derive(Default)]
struct MessageState {
    text: String,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

/// Output text that clears itself after a delay.
///
/// Showing a new message cancels the pending clear of the previous one, so
/// an old timer never wipes newer text.
#[derive(Clone, Default)]
pub struct ExpiringMessage {
    state: Arc<Mutex<MessageState>>,
}

impl ExpiringMessage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MessageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Shows `text` until `ttl` elapses. Must be called within a tokio runtime.
    pub fn show(&self, text: impl Into<String>, ttl: Duration) {
        let mut state = self.lock();
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        state.generation += 1;
        state.text = text.into();

        let generation = state.generation;
        let now = tokio::time::Instant::now();
        let deadline = now.checked_add(ttl).unwrap_or_else(|| now + FAR_FUTURE);
        let shared = Arc::clone(&self.state);
        state.timer = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let mut state = shared.lock().unwrap_or_else(PoisonError::into_inner);
            if state.generation == generation {
                debug!(generation, "Message expired");
                state.text.clear();
                state.timer = None;
            }
        }));
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        state.generation += 1;
        state.text.clear();
    }

    pub fn text(&self) -> String {
        self.lock().text.clone()
    }

    pub fn is_visible(&self) -> bool {
        !self.lock().text.is_empty()
    }
}

impl std::fmt::Debug for ExpiringMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ExpiringMessage").field(&self.text()).finish()
    }
}
