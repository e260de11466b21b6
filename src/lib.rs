//! TCGdex client for Rust.
//!
//! Fetches the Pokémon TCG card catalog from the TCGdex API with a two-tier
//! response cache, decodes category-specific card details, and drives a
//! paginated, searchable card list through [`ListController`].
//!
//! # Quick start
//!
//! ```no_run
//! use std::sync::Arc;
//! use tcgdex_client::{CatalogApi, CatalogClient, EventBus, ListController, ListControllerConfig};
//!
//! # fn main() -> tcgdex_client::Result<()> {
//! let client: Arc<dyn CatalogApi> = Arc::new(CatalogClient::builder().build()?);
//!
//! // One-off blocking lookups
//! let page = client.fetch_cards(Some("pikachu"), None, None, None)?;
//! let detail = client.fetch_card_detail(&page.items[0].id)?;
//! println!("{} is a {} card", detail.name, detail.kind());
//!
//! // Stateful list, fetching on a Tokio runtime
//! let runtime = tokio::runtime::Runtime::new()?;
//! let _guard = runtime.enter();
//! let list = ListController::new(client, EventBus::default(), ListControllerConfig::default())?;
//! if let Some(fetch) = list.load_initial() {
//!     let _ = runtime.block_on(fetch);
//! }
//! println!("{} cards", list.state().cards.len());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod controller;
pub mod decoder;
pub mod error;
pub mod events;
pub mod models;

pub use cache::{CacheManager, CacheStats, ResponseCache};
pub use client::{CatalogApi, CatalogClient, CatalogClientBuilder};
pub use controller::{
    DetailController, DetailState, ListController, ListControllerConfig, ListState, ListenerId,
    LoadingState, SearchCriteria,
};
pub use decoder::decode_card_detail;
pub use error::{ErrorKind, Result, TcgError};
pub use events::{AppEvent, EventBus, EventStream};
pub use models::{Card, CardDetail, PaginatedResult, PaginationRequest, SortField, SortOrder};
