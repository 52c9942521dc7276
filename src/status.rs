use std::{
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

/// A short message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// Holds the current status message.
///
/// Every `set` schedules its own expiry. Expiry clears whatever is showing at
/// that moment, including a message set after the one that scheduled it.
#[derive(Debug, Clone)]
pub struct StatusBoard {
    current: Arc<Mutex<Option<StatusMessage>>>,
    ttl: Duration,
}
impl StatusBoard {
    pub fn new(ttl: Duration) -> Self {
        Self {
            current: Arc::new(Mutex::new(None)),
            ttl,
        }
    }

    pub fn info(&self, text: impl Into<String>) {
        self.set(text, false);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.set(text, true);
    }

    /// Show `text` until `ttl` after this call.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime, since the expiry runs as a
    /// spawned task.
    pub fn set(&self, text: impl Into<String>, is_error: bool) {
        *self.lock() = Some(StatusMessage {
            text: text.into(),
            is_error,
        });

        let current = self.current.clone();
        let deadline = tokio::time::Instant::now() + self.ttl;
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            *current.lock().unwrap_or_else(PoisonError::into_inner) = None;
        });
    }

    pub fn current(&self) -> Option<StatusMessage> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<StatusMessage>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
