//! Stateful controllers consumed by a presentation layer.
//!
//! Controllers own their state behind a mutex, run catalog calls on the
//! Tokio blocking pool, and report every transition to registered change
//! listeners.

pub mod debounce;
pub mod detail;
pub mod list;

pub use debounce::Debouncer;
pub use detail::{DetailController, DetailState};
pub use list::{ListController, ListControllerConfig, ListState, SearchCriteria};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::runtime::Handle;

use crate::error::{Result, TcgError};

// ---------------------------------------------------------------------------
// LoadingState
// ---------------------------------------------------------------------------

/// Fetch lifecycle of a controller.
///
/// Equality compares the variant only: two `Error` states are equal whatever
/// their causes. Inspect the cause with [`LoadingState::error`] to tell
/// failures apart.
#[derive(Debug, Clone, Default)]
pub enum LoadingState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error(Arc<TcgError>),
}

impl LoadingState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading)
    }

    pub fn error(&self) -> Option<&TcgError> {
        match self {
            LoadingState::Error(cause) => Some(cause),
            _ => None,
        }
    }
}

impl PartialEq for LoadingState {
    fn eq(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl Eq for LoadingState {}

// ---------------------------------------------------------------------------
// Change listeners
// ---------------------------------------------------------------------------

/// Handle returned by `subscribe`, used to unsubscribe.
pub type ListenerId = u64;

type Listener<S> = Arc<dyn Fn(&S) + Send + Sync>;

struct Registry<S> {
    next_id: ListenerId,
    listeners: Vec<(ListenerId, Listener<S>)>,
}

struct Delivery<S> {
    /// Revision of the last snapshot handed to listeners.
    delivered: u64,
    pending: Option<(u64, S)>,
    draining: bool,
}

/// Change-listener registry that delivers snapshots in revision order.
///
/// Snapshots are produced under the controller's state lock but delivered
/// after it is released, so two threads may race to notify. Only one thread
/// delivers at a time; a snapshot arriving meanwhile is parked for it, and a
/// snapshot older than one already delivered or parked is dropped. Listeners
/// therefore always end on the latest state, and may call back into the
/// controller.
pub(crate) struct Listeners<S> {
    registry: Mutex<Registry<S>>,
    delivery: Mutex<Delivery<S>>,
}

impl<S> Default for Listeners<S> {
    fn default() -> Self {
        Self {
            registry: Mutex::new(Registry {
                next_id: 0,
                listeners: Vec::new(),
            }),
            delivery: Mutex::new(Delivery {
                delivered: 0,
                pending: None,
                draining: false,
            }),
        }
    }
}

impl<S> Listeners<S> {
    pub(crate) fn add(&self, listener: Listener<S>) -> ListenerId {
        let mut registry = lock(&self.registry);
        registry.next_id += 1;
        let id = registry.next_id;
        registry.listeners.push((id, listener));
        id
    }

    pub(crate) fn remove(&self, id: ListenerId) -> bool {
        let mut registry = lock(&self.registry);
        let before = registry.listeners.len();
        registry.listeners.retain(|(existing, _)| *existing != id);
        registry.listeners.len() != before
    }

    /// Deliver `state`, stamped with the `revision` it was taken at.
    pub(crate) fn notify(&self, revision: u64, state: S) {
        {
            let mut delivery = lock(&self.delivery);
            let newest = delivery
                .pending
                .as_ref()
                .map_or(delivery.delivered, |(parked, _)| *parked);
            if revision <= newest {
                log::trace!("Dropping stale snapshot {} (newest {})", revision, newest);
                return;
            }
            delivery.pending = Some((revision, state));
            if delivery.draining {
                return;
            }
            delivery.draining = true;
        }

        loop {
            let next = {
                let mut delivery = lock(&self.delivery);
                match delivery.pending.take() {
                    Some((revision, state)) => {
                        delivery.delivered = revision;
                        state
                    }
                    None => {
                        delivery.draining = false;
                        return;
                    }
                }
            };
            let listeners: Vec<Listener<S>> = lock(&self.registry)
                .listeners
                .iter()
                .map(|(_, l)| Arc::clone(l))
                .collect();
            for listener in listeners {
                listener(&next);
            }
        }
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn current_runtime() -> Result<Handle> {
    Handle::try_current().map_err(|_| {
        TcgError::InvalidArgument("controllers must be created inside a Tokio runtime".to_string())
    })
}
