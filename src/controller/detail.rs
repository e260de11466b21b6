//! Loader for a single card's detail record.

use std::sync::{Arc, Mutex};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::{current_runtime, lock, ListenerId, Listeners, LoadingState};
use crate::client::CatalogApi;
use crate::error::Result;
use crate::models::{Card, CardDetail, EnergyExtension, PokemonExtension, TrainerExtension};

#[derive(Debug, Clone)]
pub struct DetailState {
    pub card: Card,
    pub loading: LoadingState,
    /// Last successfully loaded record; kept while a reload is in flight.
    pub detail: Option<CardDetail>,
    pub error_message: Option<String>,
    /// Incremented on every change; listeners see strictly increasing values.
    pub revision: u64,
}

impl DetailState {
    pub fn pokemon(&self) -> Option<&PokemonExtension> {
        self.detail.as_ref().and_then(CardDetail::pokemon)
    }

    pub fn trainer(&self) -> Option<&TrainerExtension> {
        self.detail.as_ref().and_then(CardDetail::trainer)
    }

    pub fn energy(&self) -> Option<&EnergyExtension> {
        self.detail.as_ref().and_then(CardDetail::energy)
    }
}

struct DetailShared {
    api: Arc<dyn CatalogApi>,
    runtime: Handle,
    state: Mutex<DetailState>,
    listeners: Listeners<DetailState>,
}

/// Fetches and holds the [`CardDetail`] for one card.
pub struct DetailController {
    shared: Arc<DetailShared>,
}

impl DetailController {
    /// Create a controller for `card`. Must be called inside a Tokio runtime.
    pub fn new(api: Arc<dyn CatalogApi>, card: Card) -> Result<Self> {
        Ok(Self {
            shared: Arc::new(DetailShared {
                api,
                runtime: current_runtime()?,
                state: Mutex::new(DetailState {
                    card,
                    loading: LoadingState::Idle,
                    detail: None,
                    error_message: None,
                    revision: 0,
                }),
                listeners: Listeners::default(),
            }),
        })
    }

    pub fn card_name(&self) -> String {
        lock(&self.shared.state).card.name.clone()
    }

    pub fn image_url(&self) -> Option<String> {
        lock(&self.shared.state).card.high_quality_image_url()
    }

    pub fn state(&self) -> DetailState {
        lock(&self.shared.state).clone()
    }

    pub fn subscribe(&self, listener: impl Fn(&DetailState) + Send + Sync + 'static) -> ListenerId {
        self.shared.listeners.add(Arc::new(listener))
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.shared.listeners.remove(id)
    }

    /// Fetch the detail record. Returns `None` if a load is already running.
    pub fn load(&self) -> Option<JoinHandle<()>> {
        let (card_id, snapshot) = {
            let mut state = lock(&self.shared.state);
            if state.loading.is_loading() {
                return None;
            }
            state.loading = LoadingState::Loading;
            state.error_message = None;
            state.revision += 1;
            (state.card.id.clone(), state.clone())
        };
        self.shared.listeners.notify(snapshot.revision, snapshot);

        let shared = Arc::clone(&self.shared);
        Some(self.shared.runtime.spawn_blocking(move || {
            let result = shared.api.fetch_card_detail(&card_id);
            shared.finish(result);
        }))
    }

    pub fn retry(&self) -> Option<JoinHandle<()>> {
        self.load()
    }
}

impl DetailShared {
    fn finish(&self, result: Result<CardDetail>) {
        let snapshot = {
            let mut state = lock(&self.state);
            match result {
                Ok(detail) => {
                    state.detail = Some(detail);
                    state.loading = LoadingState::Loaded;
                    state.error_message = None;
                }
                Err(e) => {
                    log::warn!("Fetching details for {} failed: {}", state.card.id, e);
                    state.error_message = Some(format!("Error fetching card details: {}", e));
                    state.loading = LoadingState::Error(Arc::new(e));
                }
            }
            state.revision += 1;
            state.clone()
        };
        self.listeners.notify(snapshot.revision, snapshot);
    }
}
