//! User-visible notifications.

use std::sync::{Mutex, PoisonError};

use tracing::{error, info};

use crate::session::PollState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

/// Sink for what the user should see.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);

    /// Called after every applied generation state change.
    fn state_changed(&self, _state: &PollState) {}
}

/// Writes notifications to the log. Used by the headless binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => info!(message = %notification.message, "notification"),
            NotificationLevel::Error => error!(message = %notification.message, "notification"),
        }
    }

    fn state_changed(&self, state: &PollState) {
        info!(phase = state.phase().as_str(), bill_id = ?state.bill_id(), "generation state changed");
    }
}

/// Buffers notifications and state changes for a UI loop to drain.
#[derive(Debug, Default)]
pub struct NotificationLog {
    notifications: Mutex<Vec<Notification>>,
    states: Mutex<Vec<PollState>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn states(&self) -> Vec<PollState> {
        self.states
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Take the pending notifications, leaving the buffer empty.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.notifications.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, notification: Notification) {
        self.notifications
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }

    fn state_changed(&self, state: &PollState) {
        self.states
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(state.clone());
    }
}
