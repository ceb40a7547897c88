//! Live notification list with scheduled expiry.
//!
//! Each notification gets a [`ScheduledTask`] that removes it once its
//! duration elapses. The task only holds a weak reference to the list, and
//! the handles live inside the list itself: dismissing, clearing, or dropping
//! the center aborts the matching timers.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::Utc;
use marche_core::{
    MAX_LIVE_NOTIFICATIONS, Notification, NotificationDraft, NotificationId, NotificationQueue,
};
use parking_lot::Mutex;

use crate::scheduler::ScheduledTask;

/// Notification sink for one shopper.
#[derive(Debug)]
pub struct NotificationCenter {
    inner: Arc<Mutex<Inner>>,
    default_duration: Duration,
}

#[derive(Debug, Default)]
struct Inner {
    queue: NotificationQueue,
    timers: HashMap<NotificationId, ScheduledTask>,
}

impl NotificationCenter {
    /// Create an empty center. Drafts without a duration use `default_duration`.
    #[must_use]
    pub fn new(default_duration: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            default_duration,
        }
    }

    /// Append a notification and schedule its removal.
    ///
    /// Past [`MAX_LIVE_NOTIFICATIONS`] the oldest ones are dropped along with
    /// their timers. Must be called from within a Tokio runtime.
    pub fn add(&self, draft: NotificationDraft) -> Notification {
        let now_ms = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        let default_ms = u64::try_from(self.default_duration.as_millis()).unwrap_or(u64::MAX);

        let mut inner = self.inner.lock();
        let notification = inner.queue.push(draft, now_ms, default_ms);

        let id = notification.id;
        let weak = Arc::downgrade(&self.inner);
        let timer = ScheduledTask::after(Duration::from_millis(notification.duration), move || {
            expire(&weak, id);
        });
        inner.timers.insert(id, timer);
        for stale in inner.queue.truncate_oldest(MAX_LIVE_NOTIFICATIONS) {
            inner.timers.remove(&stale);
        }

        tracing::debug!(
            notification_id = %id,
            kind = ?notification.kind,
            duration_ms = notification.duration,
            "Notification added"
        );
        notification
    }

    /// Dismiss a notification early. Returns whether it was live.
    pub fn remove(&self, id: NotificationId) -> bool {
        let mut inner = self.inner.lock();
        inner.timers.remove(&id);
        inner.queue.remove(id)
    }

    /// Drop every notification and cancel all pending removals.
    ///
    /// Returns how many notifications were live.
    pub fn clear(&self) -> usize {
        let mut inner = self.inner.lock();
        inner.timers.clear();
        inner.queue.clear().len()
    }

    /// Snapshot of the live notifications, oldest first.
    #[must_use]
    pub fn items(&self) -> Vec<Notification> {
        self.inner.lock().queue.items().to_vec()
    }

    #[must_use]
    pub fn contains(&self, id: NotificationId) -> bool {
        self.inner.lock().queue.contains(id)
    }

    /// Number of removals still scheduled.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.inner.lock().timers.len()
    }
}

fn expire(inner: &Weak<Mutex<Inner>>, id: NotificationId) {
    let Some(inner) = inner.upgrade() else {
        return;
    };
    let mut inner = inner.lock();
    inner.queue.remove(id);
    inner.timers.remove(&id);
    tracing::trace!(notification_id = %id, "Notification expired");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center() -> NotificationCenter {
        NotificationCenter::new(Duration::from_secs(3))
    }

    #[tokio::test(start_paused = true)]
    async fn test_notification_expires_after_duration() {
        let center = center();
        let n = center.add(NotificationDraft::success("Saved", "ok").with_duration(100));
        assert!(center.contains(n.id));

        tokio::time::sleep(Duration::from_millis(99)).await;
        assert!(center.contains(n.id));

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(!center.contains(n.id));
        assert_eq!(center.pending_timers(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_duration_is_used() {
        let center = center();
        let n = center.add(NotificationDraft::info("Hello", "world"));
        assert_eq!(n.duration, 3_000);

        tokio::time::sleep(Duration::from_millis(3_001)).await;
        assert!(center.items().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_dismiss_cancels_timer() {
        let center = center();
        let n = center.add(NotificationDraft::warning("Careful", "m"));

        assert!(center.remove(n.id));
        assert!(!center.remove(n.id));
        assert_eq!(center.pending_timers(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_cancels_pending_removals() {
        let center = center();
        center.add(NotificationDraft::info("a", "a").with_duration(50));
        center.add(NotificationDraft::info("b", "b").with_duration(80));

        assert_eq!(center.clear(), 2);
        assert_eq!(center.pending_timers(), 0);

        // A notification added after the clear must outlive the old timers.
        let fresh = center.add(NotificationDraft::info("c", "c").with_duration(500));
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(center.contains(fresh.id));
        assert_eq!(center.items().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ids_are_unique_and_ordered() {
        let center = center();
        let a = center.add(NotificationDraft::info("a", "a")).id;
        let b = center.add(NotificationDraft::info("b", "b")).id;
        assert!(a < b);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_releases_state() {
        let center = center();
        center.add(NotificationDraft::info("a", "a").with_duration(50));
        let weak = Arc::downgrade(&center.inner);

        drop(center);
        assert!(weak.upgrade().is_none());
        tokio::time::sleep(Duration::from_millis(60)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_oldest_are_dropped_past_limit() {
        let center = center();
        let first = center.add(NotificationDraft::info("first", "m"));
        for _ in 0..MAX_LIVE_NOTIFICATIONS {
            center.add(NotificationDraft::info("more", "m"));
        }

        assert_eq!(center.items().len(), MAX_LIVE_NOTIFICATIONS);
        assert!(!center.contains(first.id));
        assert_eq!(center.pending_timers(), MAX_LIVE_NOTIFICATIONS);
    }
}
