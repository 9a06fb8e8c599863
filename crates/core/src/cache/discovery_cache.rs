//! Persisted discovery results.
//!
//! Two files live under the cache directory: a MessagePack data file holding
//! the encoded envelope behind a version and checksum header, and a plain
//! text tag naming the strategy the data was stored under. Anything that
//! does not decode cleanly reads as "no cache".

use crate::config::DiscoveryConfig;
use crate::error::{Result, TrellisError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::SystemTime;
use tracing::{debug, info, warn};
use trellis_api::{CacheStatus, CacheStrategy};
use trellis_plugin::CacheEnvelope;
use xxhash_rust::xxh3::xxh3_64;

pub const DATA_FILE: &str = "discoveries.msgpack";
pub const STRATEGY_FILE: &str = "strategy";
pub const CACHE_VERSION: u32 = 1;

/// On-disk data file.
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheFile {
    pub version: u32,
    pub created_at: u64,
    pub checksum: u64,
    #[serde(with = "serde_bytes")]
    pub payload: Vec<u8>,
}

impl CacheFile {
    fn encode(envelope: &CacheEnvelope) -> Result<Self> {
        let payload = rmp_serde::to_vec_named(envelope)?;
        let created_at = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        Ok(Self {
            version: CACHE_VERSION,
            created_at,
            checksum: xxh3_64(&payload),
            payload,
        })
    }

    fn decode(bytes: &[u8]) -> Result<CacheEnvelope> {
        let file: CacheFile = rmp_serde::from_slice(bytes)?;
        if file.version != CACHE_VERSION {
            return Err(TrellisError::MalformedCache(format!(
                "cache version {} (expected {})",
                file.version, CACHE_VERSION
            )));
        }
        if xxh3_64(&file.payload) != file.checksum {
            return Err(TrellisError::MalformedCache("checksum mismatch".into()));
        }
        Ok(rmp_serde::from_slice(&file.payload)?)
    }
}

pub struct DiscoveryCache {
    cache_dir: PathBuf,
    strategy: CacheStrategy,
    memo: RwLock<Option<CacheEnvelope>>,
}

impl DiscoveryCache {
    pub fn new(cache_dir: impl Into<PathBuf>, strategy: CacheStrategy) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            strategy,
            memo: RwLock::new(None),
        }
    }

    pub fn from_config(config: &DiscoveryConfig) -> Self {
        Self::new(config.cache_path(), config.cache_strategy)
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn strategy(&self) -> CacheStrategy {
        self.strategy
    }

    pub fn data_path(&self) -> PathBuf {
        self.cache_dir.join(DATA_FILE)
    }

    pub fn strategy_path(&self) -> PathBuf {
        self.cache_dir.join(STRATEGY_FILE)
    }

    /// Strategy tag written by the last `store`, if readable.
    pub fn stored_strategy(&self) -> Option<CacheStrategy> {
        let tag = fs::read_to_string(self.strategy_path()).ok()?;
        tag.trim().parse().ok()
    }

    /// Configured strategy is not `none` and matches the stored tag.
    pub fn is_enabled(&self) -> bool {
        !self.strategy.is_none() && self.stored_strategy() == Some(self.strategy)
    }

    pub fn exists(&self) -> bool {
        self.data_path().is_file()
    }

    /// Decoded envelope, or `None` when disabled, missing or malformed.
    pub fn restore(&self) -> Option<CacheEnvelope> {
        if !self.is_enabled() || !self.exists() {
            return None;
        }

        if let Some(envelope) = self.memo.read().unwrap_or_else(|e| e.into_inner()).as_ref() {
            return Some(envelope.clone());
        }

        let path = self.data_path();
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!("Cannot read discovery cache {}: {}", path.display(), e);
                return None;
            }
        };
        match CacheFile::decode(&bytes) {
            Ok(envelope) => {
                *self.memo.write().unwrap_or_else(|e| e.into_inner()) = Some(envelope.clone());
                Some(envelope)
            }
            Err(e) => {
                warn!("Ignoring malformed discovery cache {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Write the envelope and the current strategy tag.
    pub fn store(&self, envelope: &CacheEnvelope) -> Result<()> {
        fs::create_dir_all(&self.cache_dir).map_err(|source| TrellisError::CacheDirectory {
            path: self.cache_dir.clone(),
            source,
        })?;

        let file = CacheFile::encode(envelope)?;
        fs::write(self.data_path(), rmp_serde::to_vec(&file)?)?;
        fs::write(self.strategy_path(), self.strategy.as_str())?;
        self.invalidate();

        info!(
            "Stored {} discovery units ({} findings) under strategy {}",
            envelope.len(),
            envelope.finding_count(),
            self.strategy
        );
        Ok(())
    }

    /// Remove the data file and the tag. Returns whether anything was removed.
    pub fn clear(&self) -> Result<bool> {
        let mut removed = false;
        for path in [self.data_path(), self.strategy_path()] {
            match fs::remove_file(&path) {
                Ok(()) => removed = true,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        self.invalidate();
        if removed {
            info!("Cleared discovery cache at {}", self.cache_dir.display());
        }
        Ok(removed)
    }

    pub fn status(&self) -> CacheStatus {
        let enabled = self.is_enabled();
        let exists = self.exists();
        CacheStatus {
            enabled,
            exists,
            valid: enabled && exists && self.restore().is_some(),
            strategy: self.strategy,
            stored_strategy: self.stored_strategy(),
            cache_dir: self.cache_dir.clone(),
        }
    }

    fn invalidate(&self) {
        *self.memo.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}
