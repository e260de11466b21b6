//! Paginated, searchable, sortable card list.

use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use super::debounce::Debouncer;
use super::{current_runtime, lock, ListenerId, Listeners, LoadingState};
use crate::client::CatalogApi;
use crate::config;
use crate::error::{Result, TcgError};
use crate::events::{AppEvent, EventBus};
use crate::models::{Card, PaginatedResult, PaginationRequest, SortField, SortOrder};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListControllerConfig {
    /// Cards requested per page.
    pub page_size: u32,
    /// Quiet period applied to [`ListController::search_input`].
    pub debounce: Duration,
}

impl Default for ListControllerConfig {
    fn default() -> Self {
        Self {
            page_size: config::DEFAULT_PAGE_SIZE,
            debounce: config::DEFAULT_DEBOUNCE,
        }
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Search text and sort order a page was fetched with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    pub query: String,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
}

/// Snapshot of a [`ListController`].
#[derive(Debug, Clone)]
pub struct ListState {
    /// Accumulated cards in server order.
    pub cards: Vec<Card>,
    pub loading: LoadingState,
    pub error_message: Option<String>,
    pub current_page: u32,
    pub has_more_pages: bool,
    /// Live sort selection, applied to the next fetch.
    pub sort_field: SortField,
    pub sort_order: SortOrder,
    /// Criteria of the last successful fetch.
    pub committed: SearchCriteria,
    /// Search text of the most recent fetch attempt, successful or not.
    pub attempted_query: String,
    /// Incremented on every change; listeners see strictly increasing values.
    pub revision: u64,
}

impl Default for ListState {
    fn default() -> Self {
        Self {
            cards: Vec::new(),
            loading: LoadingState::Idle,
            error_message: None,
            current_page: 1,
            has_more_pages: false,
            sort_field: SortField::default(),
            sort_order: SortOrder::default(),
            committed: SearchCriteria::default(),
            attempted_query: String::new(),
            revision: 0,
        }
    }
}

impl ListState {
    /// True while the first page of a fetch is loading and nothing is shown yet.
    pub fn show_full_screen_loading(&self) -> bool {
        self.loading.is_loading() && self.cards.is_empty()
    }

    fn admits(&self, query: &str, load_more: bool) -> bool {
        match self.loading {
            LoadingState::Loading => false,
            LoadingState::Idle | LoadingState::Error(_) => true,
            LoadingState::Loaded => {
                load_more
                    || self.committed.query != query
                    || self.committed.sort_field != self.sort_field
                    || self.committed.sort_order != self.sort_order
            }
        }
    }
}

struct PageRequest {
    criteria: SearchCriteria,
    page: u32,
    load_more: bool,
}

// ---------------------------------------------------------------------------
// ListController
// ---------------------------------------------------------------------------

struct ListShared {
    api: Arc<dyn CatalogApi>,
    bus: EventBus,
    page_size: u32,
    runtime: Handle,
    state: Mutex<ListState>,
    listeners: Listeners<ListState>,
}

/// Owns the accumulated card list and decides when the catalog is queried.
///
/// A fetch is only started when it is admissible: never while another one
/// is loading, always from `Idle` or `Error`, and from `Loaded` only for a
/// load-more or when the search text or sort differs from the committed
/// criteria. Operations that may start a fetch return the background task's
/// handle, or `None` when nothing was started.
pub struct ListController {
    shared: Arc<ListShared>,
    debouncer: Debouncer<String>,
}

impl ListController {
    /// Create a controller. Must be called inside a Tokio runtime.
    pub fn new(
        api: Arc<dyn CatalogApi>,
        bus: EventBus,
        config: ListControllerConfig,
    ) -> Result<Self> {
        if config.page_size == 0 {
            return Err(TcgError::InvalidArgument(
                "page size must be at least 1".to_string(),
            ));
        }
        let shared = Arc::new(ListShared {
            api,
            bus,
            page_size: config.page_size,
            runtime: current_runtime()?,
            state: Mutex::new(ListState::default()),
            listeners: Listeners::default(),
        });

        let weak: Weak<ListShared> = Arc::downgrade(&shared);
        let debouncer = Debouncer::new(config.debounce, move |query: String| {
            if let Some(shared) = weak.upgrade() {
                let _ = shared.start(query, false);
            }
        })?;

        Ok(Self { shared, debouncer })
    }

    pub fn page_size(&self) -> u32 {
        self.shared.page_size
    }

    pub fn state(&self) -> ListState {
        lock(&self.shared.state).clone()
    }

    /// Register a listener called with a snapshot after every state change.
    pub fn subscribe(&self, listener: impl Fn(&ListState) + Send + Sync + 'static) -> ListenerId {
        self.shared.listeners.add(Arc::new(listener))
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.shared.listeners.remove(id)
    }

    // -- Fetch triggers ----------------------------------------------------

    /// Feed raw search-box text. A fetch follows once typing pauses for the
    /// configured quiet period and the text differs from the last forwarded.
    pub fn search_input(&self, text: impl Into<String>) {
        self.debouncer.push(text.into());
    }

    /// Start a fresh fetch for `text` immediately, skipping the debounce.
    pub fn search(&self, text: impl Into<String>) -> Option<JoinHandle<()>> {
        self.shared.start(text.into(), false)
    }

    /// Fetch the first page if nothing has been loaded yet.
    pub fn load_initial(&self) -> Option<JoinHandle<()>> {
        let query = {
            let state = lock(&self.shared.state);
            if state.loading != LoadingState::Idle || !state.cards.is_empty() {
                return None;
            }
            state.committed.query.clone()
        };
        self.shared.start(query, false)
    }

    /// Append the next page for the committed criteria, if there is one.
    pub fn load_more(&self) -> Option<JoinHandle<()>> {
        let query = lock(&self.shared.state).committed.query.clone();
        self.shared.start(query, true)
    }

    /// Repeat the last attempted search as a fresh fetch.
    pub fn retry(&self) -> Option<JoinHandle<()>> {
        let query = lock(&self.shared.state).attempted_query.clone();
        self.shared.start(query, false)
    }

    pub fn set_sort_field(&self, field: SortField) -> Option<JoinHandle<()>> {
        self.change_sort(|state| state.sort_field = field)
    }

    pub fn set_sort_order(&self, order: SortOrder) -> Option<JoinHandle<()>> {
        self.change_sort(|state| state.sort_order = order)
    }

    /// Publish a selection event for `card`. Controller state is untouched.
    pub fn select(&self, card: &Card) {
        log::debug!("Card selected: {}", card.id);
        self.shared.bus.publish(AppEvent::CardSelected(card.id.clone()));
    }

    fn change_sort(&self, apply: impl FnOnce(&mut ListState)) -> Option<JoinHandle<()>> {
        let (query, snapshot) = {
            let mut state = lock(&self.shared.state);
            apply(&mut state);
            state.revision += 1;
            (state.committed.query.clone(), state.clone())
        };
        self.shared.listeners.notify(snapshot.revision, snapshot);
        self.shared.start(query, false)
    }
}

impl ListShared {
    fn start(self: &Arc<Self>, query: String, load_more: bool) -> Option<JoinHandle<()>> {
        let (request, snapshot) = {
            let mut state = lock(&self.state);
            if !state.admits(&query, load_more) {
                log::trace!("Fetch for {:?} not admitted in state {:?}", query, state.loading);
                return None;
            }
            if load_more && !state.has_more_pages {
                return None;
            }

            state.loading = LoadingState::Loading;
            state.error_message = None;
            state.attempted_query = query.clone();
            if !load_more {
                state.cards.clear();
                state.current_page = 1;
                state.has_more_pages = true;
            }
            let request = PageRequest {
                page: if load_more { state.current_page + 1 } else { 1 },
                criteria: SearchCriteria {
                    query,
                    sort_field: state.sort_field,
                    sort_order: state.sort_order,
                },
                load_more,
            };
            state.revision += 1;
            (request, state.clone())
        };
        self.listeners.notify(snapshot.revision, snapshot);

        log::debug!(
            "Fetching page {} for {:?} ({} {})",
            request.page,
            request.criteria.query,
            request.criteria.sort_field,
            request.criteria.sort_order
        );
        let shared = Arc::clone(self);
        Some(self.runtime.spawn_blocking(move || {
            let result = PaginationRequest::new(request.page, shared.page_size).and_then(|p| {
                shared.api.fetch_cards(
                    Some(&request.criteria.query),
                    Some(p),
                    Some(request.criteria.sort_field),
                    Some(request.criteria.sort_order),
                )
            });
            shared.finish(request, result);
        }))
    }

    fn finish(&self, request: PageRequest, result: Result<PaginatedResult<Vec<Card>>>) {
        let snapshot = {
            let mut state = lock(&self.state);
            match result {
                Ok(page) => {
                    let received = page.items.len();
                    if request.load_more {
                        state.cards.extend(page.items);
                    } else {
                        state.cards = page.items;
                    }
                    state.current_page = request.page;
                    state.has_more_pages = received == self.page_size as usize;
                    state.loading = LoadingState::Loaded;
                    state.error_message = None;
                    state.committed = request.criteria;
                }
                Err(e) => {
                    log::warn!("Fetching page {} failed: {}", request.page, e);
                    state.error_message = Some(e.to_string());
                    state.loading = LoadingState::Error(Arc::new(e));
                }
            }
            state.revision += 1;
            state.clone()
        };
        self.listeners.notify(snapshot.revision, snapshot);
    }
}
