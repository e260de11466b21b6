//! Timer-based coalescing of rapid input.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::{current_runtime, lock};
use crate::error::Result;

struct Pending<T> {
    generation: u64,
    timer: Option<JoinHandle<()>>,
    last_forwarded: Option<T>,
}

/// Forwards the latest pushed value once no newer value has arrived for the
/// quiet period, skipping values equal to the last one forwarded.
///
/// Each push cancels the pending timer and starts a new one. A timer that
/// fires after being superseded is ignored.
pub struct Debouncer<T> {
    quiet: Duration,
    runtime: Handle,
    sink: Arc<dyn Fn(T) + Send + Sync>,
    pending: Arc<Mutex<Pending<T>>>,
}

impl<T> Debouncer<T>
where
    T: Clone + PartialEq + Send + 'static,
{
    /// Create a debouncer delivering to `sink`. Must be called inside a Tokio
    /// runtime; timers run on that runtime.
    pub fn new(quiet: Duration, sink: impl Fn(T) + Send + Sync + 'static) -> Result<Self> {
        Ok(Self {
            quiet,
            runtime: current_runtime()?,
            sink: Arc::new(sink),
            pending: Arc::new(Mutex::new(Pending {
                generation: 0,
                timer: None,
                last_forwarded: None,
            })),
        })
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    pub fn push(&self, value: T) {
        let mut pending = lock(&self.pending);
        if let Some(timer) = pending.timer.take() {
            timer.abort();
        }
        pending.generation += 1;
        let generation = pending.generation;

        let shared = Arc::clone(&self.pending);
        let sink = Arc::clone(&self.sink);
        let quiet = self.quiet;
        pending.timer = Some(self.runtime.spawn(async move {
            tokio::time::sleep(quiet).await;
            {
                let mut pending = lock(&shared);
                if pending.generation != generation {
                    return;
                }
                pending.timer = None;
                if pending.last_forwarded.as_ref() == Some(&value) {
                    return;
                }
                pending.last_forwarded = Some(value.clone());
            }
            sink(value);
        }));
    }

    /// Drop any value still waiting for its quiet period.
    pub fn cancel(&self) {
        let mut pending = lock(&self.pending);
        pending.generation += 1;
        if let Some(timer) = pending.timer.take() {
            timer.abort();
        }
    }

    pub fn last_forwarded(&self) -> Option<T> {
        lock(&self.pending).last_forwarded.clone()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(timer) = lock(&self.pending).timer.take() {
            timer.abort();
        }
    }
}
