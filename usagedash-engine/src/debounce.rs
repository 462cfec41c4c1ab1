use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::trace;

/// Delays propagation of a changing value until it has been stable for a
/// fixed interval.
///
/// Every [`push`](Debouncer::push) replaces the pending update, so at most
/// one update is scheduled at a time. Cancelled updates never publish: the
/// timer task checks its ticket under the same lock that cancellation takes.
/// Must be used from within a Tokio runtime.
pub struct Debouncer<T> {
    delay: Duration,
    shared: Arc<Shared<T>>,
}

struct Shared<T> {
    output: watch::Sender<T>,
    pending: Mutex<Pending>,
}

#[derive(Default)]
struct Pending {
    ticket: u64,
    timer: Option<JoinHandle<()>>,
}

impl<T> Debouncer<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn new(initial: T, delay: Duration) -> Self {
        let (output, _) = watch::channel(initial);
        Self {
            delay,
            shared: Arc::new(Shared {
                output,
                pending: Mutex::new(Pending::default()),
            }),
        }
    }

    /// Schedules `value` to be published once `delay` passes without another push.
    pub fn push(&self, value: T) {
        let mut pending = self.shared.pending.lock();
        pending.ticket += 1;
        if let Some(timer) = pending.timer.take() {
            timer.abort();
        }

        let ticket = pending.ticket;
        let delay = self.delay;
        let shared = Arc::clone(&self.shared);
        pending.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let mut pending = shared.pending.lock();
            if pending.ticket != ticket {
                return;
            }
            pending.timer = None;
            let changed = shared.output.send_if_modified(|current| {
                if *current == value {
                    false
                } else {
                    *current = value;
                    true
                }
            });
            trace!(ticket, changed, "debounced value settled");
        }));
    }

    /// Drops the pending update, if any.
    pub fn cancel(&self) {
        let mut pending = self.shared.pending.lock();
        pending.ticket += 1;
        if let Some(timer) = pending.timer.take() {
            timer.abort();
        }
    }

    pub fn has_pending(&self) -> bool {
        self.shared.pending.lock().timer.is_some()
    }

    /// Last settled value.
    pub fn current(&self) -> T {
        self.shared.output.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.shared.output.subscribe()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        let mut pending = self.shared.pending.lock();
        pending.ticket += 1;
        if let Some(timer) = pending.timer.take() {
            timer.abort();
        }
    }
}
