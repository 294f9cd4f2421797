//! Single-slot debounce timer.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Runs at most one pending action after a quiet period.
///
/// Scheduling replaces any action that has not fired yet. Once the delay has
/// elapsed the action is handed to its own task, so cancelling the timer
/// afterwards no longer affects it.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    slot: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, slot: None }
    }

    /// Schedules `action` to run after the delay, replacing any unfired one.
    pub fn schedule<F>(&mut self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();

        let delay = self.delay;
        self.slot = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(action);
        }));
    }

    /// Drops the pending action, if any. Returns true if one was pending.
    pub fn cancel(&mut self) -> bool {
        match self.slot.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
