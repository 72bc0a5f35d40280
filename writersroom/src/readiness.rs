//! Host readiness lifecycle.
//!
//! The pipeline must not talk to the host before it is fully initialized.
//! `Readiness` models this as an explicit two-state `NotReady -> Ready`
//! transition: tasks registered before the transition are queued and
//! drained exactly once when it fires; tasks registered after run
//! immediately. The transition is one-shot, not a recurring event.

use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use tracing::debug;

type DeferredTask = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

enum State {
    NotReady(Vec<DeferredTask>),
    Ready,
}

/// One-shot readiness gate with a deferred task queue.
pub struct Readiness {
    state: Mutex<State>,
}

impl Default for Readiness {
    fn default() -> Self {
        Self::new()
    }
}

impl Readiness {
    /// Creates a gate in the not-ready state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::NotReady(Vec::new())),
        }
    }

    /// Creates a gate that is already open, for tests and embedded use.
    #[must_use]
    pub fn already_ready() -> Self {
        Self {
            state: Mutex::new(State::Ready),
        }
    }

    /// Returns true once [`mark_ready`](Self::mark_ready) has fired.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(*self.state.lock(), State::Ready)
    }

    /// Runs the task now if ready, otherwise queues it for the transition.
    pub fn when_ready<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut state = self.state.lock();
        match &mut *state {
            State::Ready => {
                drop(state);
                tokio::spawn(task);
            }
            State::NotReady(queue) => {
                queue.push(Box::pin(task));
            }
        }
    }

    /// Transitions to ready and drains the deferred queue exactly once.
    ///
    /// Subsequent calls are no-ops.
    pub fn mark_ready(&self) {
        let queue = {
            let mut state = self.state.lock();
            match std::mem::replace(&mut *state, State::Ready) {
                State::NotReady(queue) => queue,
                State::Ready => return,
            }
        };

        debug!(deferred = queue.len(), "host ready, draining deferred tasks");
        for task in queue {
            tokio::spawn(task);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_tasks_queue_until_ready() {
        let readiness = Arc::new(Readiness::new());
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let counter = counter.clone();
            readiness.when_ready(async move {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert!(!readiness.is_ready());

        readiness.mark_ready();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 3);
        assert!(readiness.is_ready());
    }

    #[tokio::test]
    async fn test_tasks_after_ready_run_immediately() {
        let readiness = Readiness::already_ready();
        let counter = Arc::new(AtomicUsize::new(0));

        let c = counter.clone();
        readiness.when_ready(async move {
            c.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_mark_ready_is_one_shot() {
        let readiness = Readiness::new();
        let counter = Arc::new(AtomicUsize::new(0));

        let c = counter.clone();
        readiness.when_ready(async move {
            c.fetch_add(1, Ordering::SeqCst);
        });

        readiness.mark_ready();
        readiness.mark_ready();
        readiness.mark_ready();

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
