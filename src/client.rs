//! Blocking HTTP client for the TCGdex card endpoints.
//!
//! Every request resolves to a full URL which doubles as the cache key: the
//! [`ResponseCache`] is consulted first and populated with the raw body on a
//! miss. Failed requests are never retried here.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};

use crate::cache::{CacheManager, ResponseCache};
use crate::config;
use crate::decoder::decode_card_detail;
use crate::error::{Result, TcgError};
use crate::models::{Card, CardDetail, PaginatedResult, PaginationRequest, SortField, SortOrder};

/// The two catalog operations the controllers depend on.
pub trait CatalogApi: Send + Sync {
    /// Fetch one page of the card list.
    ///
    /// `sort_field` and `sort_order` default to `name` / `asc` when `None`.
    fn fetch_cards(
        &self,
        query: Option<&str>,
        pagination: Option<PaginationRequest>,
        sort_field: Option<SortField>,
        sort_order: Option<SortOrder>,
    ) -> Result<PaginatedResult<Vec<Card>>>;

    fn fetch_card_detail(&self, card_id: &str) -> Result<CardDetail>;
}

// ---------------------------------------------------------------------------
// CatalogClientBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`CatalogClient`].
///
/// Use [`CatalogClient::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](CatalogClientBuilder::build).
pub struct CatalogClientBuilder {
    base_url: String,
    language: String,
    cache_dir: Option<PathBuf>,
    memory_capacity: usize,
    disk_capacity: u64,
    timeout: Option<Duration>,
    cache: Option<Arc<dyn ResponseCache>>,
}

impl Default for CatalogClientBuilder {
    fn default() -> Self {
        Self {
            base_url: config::API_BASE.to_string(),
            language: config::DEFAULT_LANGUAGE.to_string(),
            cache_dir: None,
            memory_capacity: config::DEFAULT_MEMORY_CAPACITY,
            disk_capacity: config::DEFAULT_DISK_CAPACITY,
            timeout: None,
            cache: None,
        }
    }
}

impl CatalogClientBuilder {
    /// Override the API root (defaults to `https://api.tcgdex.net/v2`).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Catalog language segment. Defaults to `en`.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Directory for the on-disk cache tier.
    ///
    /// If not set, the platform-appropriate default cache directory is used
    /// (e.g. `~/.cache/tcgdex-client` on Linux).
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn memory_capacity(mut self, bytes: usize) -> Self {
        self.memory_capacity = bytes;
        self
    }

    pub fn disk_capacity(mut self, bytes: u64) -> Self {
        self.disk_capacity = bytes;
        self
    }

    /// Set a request timeout. Unset means the transport default applies.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a caller-supplied cache instead of building a [`CacheManager`].
    ///
    /// The cache is cleared when the client is built.
    pub fn cache(mut self, cache: Arc<dyn ResponseCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn build(self) -> Result<CatalogClient> {
        let mut base_url = Url::parse(&self.base_url)
            .map_err(|e| TcgError::InvalidArgument(format!("invalid base URL {}: {}", self.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(TcgError::InvalidArgument(format!(
                "base URL cannot carry a path: {}",
                self.base_url
            )));
        }
        base_url
            .path_segments_mut()
            .map_err(|_| TcgError::InvalidArgument(self.base_url.clone()))?
            .pop_if_empty()
            .push(&self.language)
            .push("cards");

        let cache: Arc<dyn ResponseCache> = match self.cache {
            Some(cache) => {
                cache.clear();
                cache
            }
            None => Arc::new(CacheManager::new(
                self.cache_dir,
                self.memory_capacity,
                self.disk_capacity,
            )?),
        };

        let mut http = Client::builder()
            .user_agent(config::USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10));
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }

        Ok(CatalogClient {
            http: http.build()?,
            cards_url: base_url,
            cache,
        })
    }
}

// ---------------------------------------------------------------------------
// CatalogClient
// ---------------------------------------------------------------------------

/// Cached client for the card list and card detail endpoints.
///
/// Created via [`CatalogClient::builder()`]. The client is blocking; async
/// callers run it on a blocking thread pool (the controllers do this).
pub struct CatalogClient {
    http: Client,
    cards_url: Url,
    cache: Arc<dyn ResponseCache>,
}

impl CatalogClient {
    pub fn builder() -> CatalogClientBuilder {
        CatalogClientBuilder::default()
    }

    pub fn cache(&self) -> &Arc<dyn ResponseCache> {
        &self.cache
    }

    /// Resolve the list URL for the given criteria.
    ///
    /// Parameters appear in a fixed order so that equal criteria always map
    /// to the same cache key.
    pub fn cards_url(
        &self,
        query: Option<&str>,
        pagination: Option<PaginationRequest>,
        sort_field: Option<SortField>,
        sort_order: Option<SortOrder>,
    ) -> Url {
        let mut params: Vec<(&str, String)> = Vec::with_capacity(5);
        if let Some(q) = query.filter(|q| !q.is_empty()) {
            params.push(("name", q.to_string()));
        }
        params.push(("sort:field", sort_field.unwrap_or_default().as_str().to_string()));
        params.push(("sort:order", sort_order.unwrap_or_default().as_query().to_string()));
        if let Some(p) = pagination {
            params.extend(p.query_pairs());
        }

        // Keys are sent verbatim (`sort:field`, not `sort%3Afield`); only values are encoded.
        let query_string = params
            .iter()
            .map(|(name, value)| format!("{}={}", name, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        let mut url = self.cards_url.clone();
        url.set_query(Some(&query_string));
        url
    }

    pub fn card_url(&self, card_id: &str) -> Url {
        let mut url = self.cards_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(card_id);
        }
        url
    }

    /// Return the body for `url`, from the cache when possible.
    fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>> {
        let key = url.as_str();
        if let Some(bytes) = self.cache.get(key) {
            log::debug!("Cache hit: {}", key);
            return Ok(bytes);
        }

        log::debug!("Fetching {}", key);
        let resp = self.http.get(url.clone()).send()?;
        let status = resp.status();
        if status != StatusCode::OK {
            log::warn!("Request to {} failed with HTTP {}", key, status.as_u16());
            return Err(TcgError::BadResponse {
                status: status.as_u16(),
                url: key.to_string(),
            });
        }
        let bytes = resp.bytes()?.to_vec();
        self.cache.put(key, &bytes);
        Ok(bytes)
    }
}

impl CatalogApi for CatalogClient {
    fn fetch_cards(
        &self,
        query: Option<&str>,
        pagination: Option<PaginationRequest>,
        sort_field: Option<SortField>,
        sort_order: Option<SortOrder>,
    ) -> Result<PaginatedResult<Vec<Card>>> {
        let url = self.cards_url(query, pagination, sort_field, sort_order);
        let bytes = self.fetch_bytes(&url)?;
        let items: Vec<Card> = serde_json::from_slice(&bytes)?;

        // A short page marks the end of the data; a full one may have more behind it.
        let is_last_page = match pagination {
            Some(p) => (items.len() as u64) < u64::from(p.items_per_page()),
            None => true,
        };

        Ok(PaginatedResult {
            page: pagination.map(|p| p.page()).unwrap_or(1),
            items,
            is_last_page,
        })
    }

    fn fetch_card_detail(&self, card_id: &str) -> Result<CardDetail> {
        let url = self.card_url(card_id);
        let bytes = self.fetch_bytes(&url)?;
        decode_card_detail(&bytes)
    }
}
