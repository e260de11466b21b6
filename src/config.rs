use std::path::PathBuf;
use std::time::Duration;

pub const API_BASE: &str = "https://api.tcgdex.net/v2";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const USER_AGENT: &str = concat!("tcgdex-client/", env!("CARGO_PKG_VERSION"));

/// Cards requested per page by the list controller.
pub const DEFAULT_PAGE_SIZE: u32 = 40;

/// Quiet period before debounced search input is forwarded.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

pub const DEFAULT_MEMORY_CAPACITY: usize = 150 * 1024 * 1024;
pub const DEFAULT_DISK_CAPACITY: u64 = 500 * 1024 * 1024;

pub const EVENT_BUS_CAPACITY: usize = 64;

pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("tcgdex-client")
    } else {
        PathBuf::from(".tcgdex-client-cache")
    }
}
