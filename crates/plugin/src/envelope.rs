//! Serializable projection of discovery findings.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use trellis_api::Location;

/// Findings recorded for one location, in discovery order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedLocation {
    pub location: Location,
    pub findings: Vec<Value>,
}

/// Cacheable data of a single discovery unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitCache {
    pub locations: Vec<CachedLocation>,
}

impl UnitCache {
    pub fn is_empty(&self) -> bool {
        self.finding_count() == 0
    }

    pub fn finding_count(&self) -> usize {
        self.locations.iter().map(|l| l.findings.len()).sum()
    }
}

/// Unit id → cacheable findings, in unit registration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheEnvelope {
    units: IndexMap<String, UnitCache>,
}

impl CacheEnvelope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, unit: impl Into<String>, data: UnitCache) {
        self.units.insert(unit.into(), data);
    }

    pub fn take(&mut self, unit: &str) -> Option<UnitCache> {
        self.units.shift_remove(unit)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn finding_count(&self) -> usize {
        self.units.values().map(UnitCache::finding_count).sum()
    }
}
