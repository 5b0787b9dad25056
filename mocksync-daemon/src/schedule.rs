use std::future::Future;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::Instant;

/// One-shot deferred execution on the daemon's event loop.
///
/// Delays are measured from the `schedule` call. Scheduled tasks are
/// fire-and-forget: nothing tracks or cancels them once registered, and each
/// runs exactly once after its delay.
#[derive(Debug, Clone)]
pub struct Scheduler {
    handle: Handle,
}

impl Scheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Scheduler bound to the runtime of the calling task.
    ///
    /// Panics when called outside a tokio runtime.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }

    pub fn schedule<F>(&self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let deadline = Instant::now() + delay;
        self.handle.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            task.await;
        });
    }
}
