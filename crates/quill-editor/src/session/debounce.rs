//! Single-slot debounce timer.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// A single-slot timer: `arm` schedules one pending action and replaces any
/// previous one, `cancel` clears it. At most one action is pending at a
/// time.
///
/// A fired action runs as a detached task, so cancellation only affects
/// timers that have not fired yet, never a request already in flight.
#[derive(Debug, Default)]
pub struct Debouncer {
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to run after `delay`, replacing any pending action
    /// and resetting the delay. Must be called from within a Tokio runtime.
    pub fn arm<F>(&mut self, delay: Duration, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(action);
        }));
    }

    /// Clear any pending action. A no-op when nothing is pending.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// True while an action is scheduled but has not fired.
    pub fn is_armed(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn rearming_replaces_the_pending_action() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new();

        for _ in 0..3 {
            let fired = fired.clone();
            debouncer.arm(Duration::from_secs(5), async move {
                fired.fetch_add(1, Ordering::SeqCst);
            });
        }

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_clears_the_pending_action() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new();

        {
            let fired = fired.clone();
            debouncer.arm(Duration::from_secs(5), async move {
                fired.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert!(debouncer.is_armed());
        debouncer.cancel();
        assert!(!debouncer.is_armed());

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn rearm_resets_the_delay() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new();

        {
            let fired = fired.clone();
            debouncer.arm(Duration::from_secs(5), async move {
                fired.fetch_add(1, Ordering::SeqCst);
            });
        }
        tokio::time::sleep(Duration::from_secs(3)).await;

        {
            let fired = fired.clone();
            debouncer.arm(Duration::from_secs(5), async move {
                fired.fetch_add(1, Ordering::SeqCst);
            });
        }
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
