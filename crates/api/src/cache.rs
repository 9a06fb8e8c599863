use crate::models::{CacheStrategy, Phase};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Snapshot of the discovery cache as seen by the current configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStatus {
    /// Strategy is not `none` and matches the stored tag.
    pub enabled: bool,
    /// The data file is present.
    pub exists: bool,
    /// Enabled, present and decodes to a well-formed envelope.
    pub valid: bool,
    pub strategy: CacheStrategy,
    pub stored_strategy: Option<CacheStrategy>,
    pub cache_dir: PathBuf,
}

/// Per-unit counts reported after discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSummary {
    pub unit: String,
    pub phase: Phase,
    pub findings: usize,
    pub restored: bool,
}
