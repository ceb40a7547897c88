//! Transient user-facing notifications.
//!
//! The queue only tracks which notifications are live. Expiry is driven from
//! outside (the storefront schedules a removal per notification), so this
//! module stays free of timers.

use serde::{Deserialize, Serialize};

/// Default lifetime of a notification in milliseconds.
pub const DEFAULT_NOTIFICATION_DURATION_MS: u64 = 3_000;

/// Longest lifetime a notification may request, in milliseconds.
pub const MAX_NOTIFICATION_DURATION_MS: u64 = 60_000;

/// Most notifications live at once for one shopper.
pub const MAX_LIVE_NOTIFICATIONS: usize = 20;

/// Monotonic, time-derived notification identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(u64);

impl NotificationId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Info,
    Error,
    Warning,
}

/// A live notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// Lifetime in milliseconds.
    pub duration: u64,
}

/// Input for a new notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationDraft {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    /// Lifetime in milliseconds; the notifier's default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
}

impl NotificationDraft {
    #[must_use]
    pub fn new(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            duration: None,
        }
    }

    #[must_use]
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, title, message)
    }

    #[must_use]
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, title, message)
    }

    #[must_use]
    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Warning, title, message)
    }

    #[must_use]
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, title, message)
    }

    #[must_use]
    pub const fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration = Some(duration_ms);
        self
    }
}

/// Ordered list of live notifications.
#[derive(Debug, Clone, Default)]
pub struct NotificationQueue {
    items: Vec<Notification>,
    last_id: u64,
}

impl NotificationQueue {
    #[must_use]
    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: NotificationId) -> bool {
        self.items.iter().any(|n| n.id == id)
    }

    /// Append a notification and return a copy of it.
    ///
    /// `now_ms` seeds the id; ids never repeat or go backwards even when two
    /// notifications arrive within the same millisecond. The duration is
    /// capped at [`MAX_NOTIFICATION_DURATION_MS`].
    pub fn push(
        &mut self,
        draft: NotificationDraft,
        now_ms: u64,
        default_duration: u64,
    ) -> Notification {
        let id = now_ms.max(self.last_id.saturating_add(1));
        self.last_id = id;
        let notification = Notification {
            id: NotificationId(id),
            kind: draft.kind,
            title: draft.title,
            message: draft.message,
            duration: draft
                .duration
                .unwrap_or(default_duration)
                .min(MAX_NOTIFICATION_DURATION_MS),
        };
        self.items.push(notification.clone());
        notification
    }

    /// Remove a notification. Returns whether it was live.
    pub fn remove(&mut self, id: NotificationId) -> bool {
        let before = self.items.len();
        self.items.retain(|n| n.id != id);
        self.items.len() != before
    }

    /// Drop the oldest notifications until at most `max` remain.
    ///
    /// Returns the ids that were dropped.
    pub fn truncate_oldest(&mut self, max: usize) -> Vec<NotificationId> {
        let excess = self.items.len().saturating_sub(max);
        self.items.drain(..excess).map(|n| n.id).collect()
    }

    /// Drop every notification, returning the ids that were live.
    pub fn clear(&mut self) -> Vec<NotificationId> {
        self.items.drain(..).map(|n| n.id).collect()
    }
}
