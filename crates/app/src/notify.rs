//! User-facing notifications
//!
//! Errors stay on screen until dismissed. Successes fade after a few
//! seconds. A notification with an id replaces any earlier one with the
//! same id, so repeated failures of the same fetch show up once.

use std::sync::RwLock;
use std::time::Duration;
use tracing::debug;

/// How long success notifications stay visible
pub const SUCCESS_DURATION: Duration = Duration::from_secs(4);

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Something worked
    Success,
    /// Something failed
    Error,
    /// Neutral information
    Info,
}

/// When a notification goes away on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Only when dismissed
    Persistent,
    /// After the given time
    After(Duration),
}

/// A message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Deduplication key
    pub id: String,
    /// Severity
    pub level: Level,
    /// Text shown to the user
    pub message: String,
    /// Lifetime
    pub expiry: Expiry,
    /// Whether the user can close it
    pub dismissible: bool,
}

impl Notification {
    /// A persistent, dismissible error
    pub fn error(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            level: Level::Error,
            message: message.into(),
            expiry: Expiry::Persistent,
            dismissible: true,
        }
    }

    /// A short-lived success
    pub fn success(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            level: Level::Success,
            message: message.into(),
            expiry: Expiry::After(SUCCESS_DURATION),
            dismissible: true,
        }
    }

    /// A short-lived informational message
    pub fn info(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            level: Level::Info,
            message: message.into(),
            expiry: Expiry::After(SUCCESS_DURATION),
            dismissible: true,
        }
    }

    /// Whether this is an error
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.level == Level::Error
    }
}

/// Sink for notifications
pub trait Notifier: Send + Sync {
    /// Show `notification`
    fn notify(&self, notification: Notification);
}

/// In-memory list of active notifications
#[derive(Debug, Default)]
pub struct NotificationCenter {
    active: RwLock<Vec<Notification>>,
}

impl NotificationCenter {
    /// Create an empty center
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the active notifications, oldest first
    #[must_use]
    pub fn active(&self) -> Vec<Notification> {
        self.active.read().map(|g| g.clone()).unwrap_or_default()
    }

    /// Active notification with `id`
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Notification> {
        self.active
            .read()
            .ok()
            .and_then(|g| g.iter().find(|n| n.id == id).cloned())
    }

    /// Active error notifications
    #[must_use]
    pub fn errors(&self) -> Vec<Notification> {
        self.active().into_iter().filter(Notification::is_error).collect()
    }

    /// Close the notification with `id`, returning whether it was dismissible and present
    pub fn dismiss(&self, id: &str) -> bool {
        let Ok(mut guard) = self.active.write() else {
            return false;
        };
        let before = guard.len();
        guard.retain(|n| !(n.id == id && n.dismissible));
        before != guard.len()
    }

    /// Close every dismissible notification
    pub fn dismiss_all(&self) {
        if let Ok(mut guard) = self.active.write() {
            guard.retain(|n| !n.dismissible);
        }
    }
}

impl Notifier for NotificationCenter {
    fn notify(&self, notification: Notification) {
        debug!(id = %notification.id, level = ?notification.level, message = %notification.message, "Notification");
        if let Ok(mut guard) = self.active.write() {
            guard.retain(|n| n.id != notification.id);
            guard.push(notification);
        }
    }
}
