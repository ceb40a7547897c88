//! Cancellable delayed tasks.
//!
//! Every timer-driven side effect (notification expiry, cart reveal) is held
//! as a [`ScheduledTask`] next to the state it affects. Dropping or
//! cancelling the handle aborts the task, so clearing or tearing down a store
//! never leaves a callback behind that later mutates it.

use std::time::Duration;

use tokio::task::JoinHandle;

/// Handle to a callback scheduled on the Tokio runtime.
#[derive(Debug)]
pub struct ScheduledTask {
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    /// Run `f` once after `delay`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn after<F>(delay: Duration, f: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            f();
        });
        Self { handle }
    }

    /// Abort the task if it has not run yet.
    pub fn cancel(self) {
        drop(self);
    }

    /// Whether the task has completed or been aborted.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
