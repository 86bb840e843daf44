//! Cancellable live subscription

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::{AbortHandle, JoinHandle};

/// Open/closed switch shared by a subscription task and its closers.
///
/// Updates run under the lock, so once [`SubscriptionCloser::close`]
/// returns no update is in flight and none will follow.
#[derive(Debug, Clone)]
pub struct Liveness {
    open: Arc<Mutex<bool>>,
}

impl Liveness {
    fn new() -> Self {
        Self {
            open: Arc::new(Mutex::new(true)),
        }
    }

    /// Run `apply` only while the subscription is open
    pub fn run_if_open(&self, apply: impl FnOnce()) -> bool {
        let open = self.open.lock();
        if *open {
            apply();
        }
        *open
    }

    fn close(&self) {
        *self.open.lock() = false;
    }
}

/// Owns the task draining a profile feed.
///
/// Dropping the handle cancels the subscription, so a page that forgets to
/// call [`SubscriptionHandle::cancel`] still releases the listener on teardown.
#[derive(Debug)]
pub struct SubscriptionHandle {
    task: JoinHandle<()>,
    liveness: Liveness,
}

/// Closes a subscription without owning it
#[derive(Debug, Clone)]
pub struct SubscriptionCloser {
    abort: AbortHandle,
    liveness: Liveness,
}

impl SubscriptionCloser {
    pub fn close(&self) {
        self.liveness.close();
        self.abort.abort();
    }
}

impl SubscriptionHandle {
    pub(crate) fn spawn<F, Fut>(run: F) -> Self
    where
        F: FnOnce(Liveness) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let liveness = Liveness::new();
        Self {
            task: tokio::spawn(run(liveness.clone())),
            liveness,
        }
    }

    /// Still receiving updates
    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }

    pub(crate) fn closer(&self) -> SubscriptionCloser {
        SubscriptionCloser {
            abort: self.task.abort_handle(),
            liveness: self.liveness.clone(),
        }
    }

    pub fn cancel(self) {
        // Drop does the work
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.liveness.close();
        self.task.abort();
    }
}
