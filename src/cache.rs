//! Response cache keyed by resolved request URL.
//!
//! [`CacheManager`] keeps raw response bodies in a bounded in-memory tier
//! backed by a bounded directory of gzip-compressed files. Both tiers evict
//! least recently used entries first.
//!
//! Disk entries are named after the SHA-256 of their key and carry the key
//! inside the compressed payload, so a file is only ever served for the key
//! that wrote it. Construction removes entry files left by earlier sessions;
//! anything else in the directory is left alone.

use crate::config;
use crate::error::Result;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::SystemTime;

/// Read/write contract the catalog client relies on.
///
/// Reads never fail: a miss, or an entry that cannot be read back, is `None`.
pub trait ResponseCache: Send + Sync {
    fn get(&self, key: &str) -> Option<Vec<u8>>;
    fn put(&self, key: &str, bytes: &[u8]);
    fn clear(&self);
}

/// Snapshot of cache occupancy and hit counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub memory_entries: usize,
    pub memory_bytes: usize,
    pub disk_entries: usize,
    pub disk_bytes: u64,
    pub hits: u64,
    pub misses: u64,
}

/// Per-entry metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryInfo {
    pub stored_at: SystemTime,
    /// Uncompressed body length.
    pub size: usize,
}

struct MemoryEntry {
    bytes: Vec<u8>,
    info: EntryInfo,
    last_used: u64,
}

struct DiskEntry {
    path: PathBuf,
    info: EntryInfo,
    /// Compressed length on disk.
    stored_len: u64,
    last_used: u64,
}

#[derive(Default)]
struct Tiers {
    memory: HashMap<String, MemoryEntry>,
    memory_bytes: usize,
    disk: HashMap<String, DiskEntry>,
    disk_bytes: u64,
    clock: u64,
    hits: u64,
    misses: u64,
}

impl Tiers {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }
}

/// Two-tier (memory + disk) response cache.
pub struct CacheManager {
    /// Directory holding the secondary tier, if any.
    pub cache_dir: Option<PathBuf>,
    memory_capacity: usize,
    disk_capacity: u64,
    tiers: Mutex<Tiers>,
}

impl CacheManager {
    /// Create a cache with a secondary tier under `cache_dir`.
    ///
    /// If `cache_dir` is `None`, uses the platform-appropriate default cache
    /// directory. Creates the directory if needed and removes entry files a
    /// previous session left behind.
    pub fn new(
        cache_dir: Option<PathBuf>,
        memory_capacity: usize,
        disk_capacity: u64,
    ) -> Result<Self> {
        let dir = cache_dir.unwrap_or_else(config::default_cache_dir);
        fs::create_dir_all(&dir)?;
        let cache = Self {
            cache_dir: Some(dir),
            memory_capacity,
            disk_capacity,
            tiers: Mutex::new(Tiers::default()),
        };
        cache.clear();
        Ok(cache)
    }

    /// Create a memory-only cache.
    pub fn in_memory(memory_capacity: usize) -> Self {
        Self {
            cache_dir: None,
            memory_capacity,
            disk_capacity: 0,
            tiers: Mutex::new(Tiers::default()),
        }
    }

    pub fn stats(&self) -> CacheStats {
        let tiers = self.lock();
        CacheStats {
            memory_entries: tiers.memory.len(),
            memory_bytes: tiers.memory_bytes,
            disk_entries: tiers.disk.len(),
            disk_bytes: tiers.disk_bytes,
            hits: tiers.hits,
            misses: tiers.misses,
        }
    }

    /// Metadata for `key`, from whichever tier holds it.
    pub fn entry_info(&self, key: &str) -> Option<EntryInfo> {
        let tiers = self.lock();
        tiers
            .memory
            .get(key)
            .map(|e| e.info)
            .or_else(|| tiers.disk.get(key).map(|e| e.info))
    }

    fn lock(&self) -> MutexGuard<'_, Tiers> {
        self.tiers.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn insert_memory(&self, tiers: &mut Tiers, key: &str, bytes: Vec<u8>, info: EntryInfo) {
        if bytes.len() > self.memory_capacity {
            return;
        }
        if let Some(old) = tiers.memory.remove(key) {
            tiers.memory_bytes -= old.bytes.len();
        }
        while tiers.memory_bytes + bytes.len() > self.memory_capacity {
            let Some(victim) = tiers
                .memory
                .iter()
                .min_by_key(|(_, e)| e.last_used)
                .map(|(k, _)| k.clone())
            else {
                break;
            };
            if let Some(evicted) = tiers.memory.remove(&victim) {
                tiers.memory_bytes -= evicted.bytes.len();
                log::debug!("Evicted {} from memory cache", victim);
            }
        }
        let last_used = tiers.tick();
        tiers.memory_bytes += bytes.len();
        tiers.memory.insert(
            key.to_string(),
            MemoryEntry {
                bytes,
                info,
                last_used,
            },
        );
    }

    fn insert_disk(&self, tiers: &mut Tiers, dir: &Path, key: &str, bytes: &[u8], info: EntryInfo) {
        let compressed = match compress(key, bytes) {
            Ok(c) => c,
            Err(e) => {
                log::warn!("Failed to compress cache entry for {}: {}", key, e);
                return;
            }
        };
        let stored_len = compressed.len() as u64;
        if stored_len > self.disk_capacity {
            return;
        }

        if let Some(old) = tiers.disk.remove(key) {
            tiers.disk_bytes -= old.stored_len;
            let _ = fs::remove_file(&old.path);
        }
        while tiers.disk_bytes + stored_len > self.disk_capacity {
            let Some(victim) = tiers
                .disk
                .iter()
                .min_by_key(|(_, e)| e.last_used)
                .map(|(k, _)| k.clone())
            else {
                break;
            };
            if let Some(evicted) = tiers.disk.remove(&victim) {
                tiers.disk_bytes -= evicted.stored_len;
                let _ = fs::remove_file(&evicted.path);
                log::debug!("Evicted {} from disk cache", victim);
            }
        }

        let path = dir.join(entry_file_name(key));
        if let Err(e) = fs::write(&path, &compressed) {
            log::warn!("Failed to write cache file {}: {}", path.display(), e);
            let _ = fs::remove_file(&path);
            return;
        }
        let last_used = tiers.tick();
        tiers.disk_bytes += stored_len;
        tiers.disk.insert(
            key.to_string(),
            DiskEntry {
                path,
                info,
                stored_len,
                last_used,
            },
        );
    }

    fn read_disk(tiers: &mut Tiers, key: &str) -> Option<(Vec<u8>, EntryInfo)> {
        let tick = tiers.tick();
        let entry = tiers.disk.get_mut(key)?;
        entry.last_used = tick;
        match decompress(&entry.path, key) {
            Ok(bytes) => Some((bytes, entry.info)),
            Err(e) => {
                log::warn!(
                    "Unreadable cache file {}, dropping entry: {}",
                    entry.path.display(),
                    e
                );
                let path = entry.path.clone();
                let stored_len = entry.stored_len;
                tiers.disk.remove(key);
                tiers.disk_bytes -= stored_len;
                let _ = fs::remove_file(path);
                None
            }
        }
    }
}

impl ResponseCache for CacheManager {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        let mut tiers = self.lock();
        let tick = tiers.tick();
        if let Some(entry) = tiers.memory.get_mut(key) {
            entry.last_used = tick;
            let bytes = entry.bytes.clone();
            tiers.hits += 1;
            return Some(bytes);
        }

        match Self::read_disk(&mut tiers, key) {
            Some((bytes, info)) => {
                tiers.hits += 1;
                self.insert_memory(&mut tiers, key, bytes.clone(), info);
                Some(bytes)
            }
            None => {
                tiers.misses += 1;
                None
            }
        }
    }

    fn put(&self, key: &str, bytes: &[u8]) {
        let info = EntryInfo {
            stored_at: SystemTime::now(),
            size: bytes.len(),
        };
        let mut tiers = self.lock();
        self.insert_memory(&mut tiers, key, bytes.to_vec(), info);
        if let Some(dir) = &self.cache_dir {
            self.insert_disk(&mut tiers, dir, key, bytes, info);
        }
    }

    /// Drop every entry from both tiers and delete entry files from the cache
    /// directory.
    fn clear(&self) {
        let mut tiers = self.lock();
        tiers.memory.clear();
        tiers.memory_bytes = 0;
        tiers.disk.clear();
        tiers.disk_bytes = 0;

        let Some(dir) = &self.cache_dir else {
            return;
        };
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Failed to list cache directory {}: {}", dir.display(), e);
                return;
            }
        };
        let mut removed = 0usize;
        for entry in entries.flatten() {
            let path = entry.path();
            let owned = path.is_file()
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(is_entry_file_name);
            if !owned {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => log::warn!("Failed to remove {}: {}", path.display(), e),
            }
        }
        log::info!("Cleared response cache at {} ({} files)", dir.display(), removed);
    }
}

const ENTRY_PREFIX: &str = "entry-";
const ENTRY_SUFFIX: &str = ".gz";

fn entry_file_name(key: &str) -> String {
    format!(
        "{}{}{}",
        ENTRY_PREFIX,
        hex::encode(Sha256::digest(key.as_bytes())),
        ENTRY_SUFFIX
    )
}

/// `entry-<64 hex digits>.gz`
fn is_entry_file_name(name: &str) -> bool {
    name.strip_prefix(ENTRY_PREFIX)
        .and_then(|rest| rest.strip_suffix(ENTRY_SUFFIX))
        .is_some_and(|digest| digest.len() == 64 && digest.bytes().all(|b| b.is_ascii_hexdigit()))
}

/// Gzip `[key length: u32 LE][key][body]`.
fn compress(key: &str, bytes: &[u8]) -> io::Result<Vec<u8>> {
    let key_len = u32::try_from(key.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "cache key too long"))?;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&key_len.to_le_bytes())?;
    encoder.write_all(key.as_bytes())?;
    encoder.write_all(bytes)?;
    encoder.finish()
}

/// Read back an entry written by [`compress`], rejecting one stored for another key.
fn decompress(path: &Path, key: &str) -> io::Result<Vec<u8>> {
    let file = fs::File::open(path)?;
    let mut decoder = GzDecoder::new(file);
    let mut contents = Vec::new();
    decoder.read_to_end(&mut contents)?;

    let invalid = |msg: &str| io::Error::new(io::ErrorKind::InvalidData, msg.to_string());
    let (len, rest) = contents
        .split_first_chunk::<4>()
        .ok_or_else(|| invalid("truncated entry header"))?;
    let key_len = u32::from_le_bytes(*len) as usize;
    if rest.len() < key_len || &rest[..key_len] != key.as_bytes() {
        return Err(invalid("entry belongs to a different key"));
    }
    Ok(rest[key_len..].to_vec())
}
