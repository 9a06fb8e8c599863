use crate::envelope::{CachedLocation, UnitCache};
use crate::error::DiscoveryError;
use indexmap::IndexMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use trellis_api::Location;

/// Location-partitioned findings of one unit.
///
/// Locations keep the order in which they were first seen and findings keep
/// insertion order inside a location; `apply` registers in exactly this order.
#[derive(Debug, Clone)]
pub struct FindingCollection<F> {
    entries: IndexMap<Location, Vec<F>>,
}

impl<F> Default for FindingCollection<F> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<F> FindingCollection<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, location: &Location, finding: F) {
        match self.entries.get_mut(location) {
            Some(findings) => findings.push(finding),
            None => {
                self.entries.insert(location.clone(), vec![finding]);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.entries.keys()
    }

    pub fn for_location(&self, location: &Location) -> &[F] {
        self.entries
            .get(location)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Flattened view, location order first.
    pub fn iter(&self) -> impl Iterator<Item = (&Location, &F)> {
        self.entries
            .iter()
            .flat_map(|(location, findings)| findings.iter().map(move |f| (location, f)))
    }

    pub fn findings(&self) -> impl Iterator<Item = &F> {
        self.entries.values().flatten()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<F> FindingCollection<F>
where
    F: Serialize + DeserializeOwned,
{
    pub fn to_unit_cache(&self, unit: &str) -> Result<UnitCache, DiscoveryError> {
        let mut locations = Vec::with_capacity(self.entries.len());
        for (location, findings) in &self.entries {
            let findings = findings
                .iter()
                .map(serde_json::to_value)
                .collect::<Result<Vec<_>, _>>()
                .map_err(|source| DiscoveryError::Projection {
                    unit: unit.to_string(),
                    source,
                })?;
            locations.push(CachedLocation {
                location: location.clone(),
                findings,
            });
        }
        Ok(UnitCache { locations })
    }

    /// Rebuild a collection from cached data. Nothing is kept on failure.
    pub fn from_unit_cache(unit: &str, data: UnitCache) -> Result<Self, DiscoveryError> {
        let mut collection = Self::new();
        for cached in data.locations {
            for value in cached.findings {
                let finding = serde_json::from_value(value).map_err(|source| {
                    DiscoveryError::Restore {
                        unit: unit.to_string(),
                        source,
                    }
                })?;
                collection.push(&cached.location, finding);
            }
        }
        Ok(collection)
    }
}

/// A unit's findings plus whether they came from the cache.
#[derive(Debug, Clone)]
pub struct UnitFindings<F> {
    collection: FindingCollection<F>,
    restored: bool,
}

impl<F> Default for UnitFindings<F> {
    fn default() -> Self {
        Self {
            collection: FindingCollection::new(),
            restored: false,
        }
    }
}

impl<F> UnitFindings<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, location: &Location, finding: F) {
        self.collection.push(location, finding);
    }

    pub fn findings(&self) -> impl Iterator<Item = &F> {
        self.collection.findings()
    }

    pub fn collection(&self) -> &FindingCollection<F> {
        &self.collection
    }
}

/// Type-erased access to [`UnitFindings`], which the cache-facing defaults of
/// [`DiscoveryUnit`](crate::DiscoveryUnit) go through.
pub trait FindingStore {
    fn count(&self) -> usize;

    fn to_unit_cache(&self, unit: &str) -> Result<UnitCache, DiscoveryError>;

    /// Replace the findings with cached ones and mark them restored.
    /// Nothing changes on failure.
    fn restore(&mut self, unit: &str, data: UnitCache) -> Result<(), DiscoveryError>;

    fn is_restored(&self) -> bool;

    fn reset(&mut self);
}

impl<F> FindingStore for UnitFindings<F>
where
    F: Serialize + DeserializeOwned,
{
    fn count(&self) -> usize {
        self.collection.len()
    }

    fn to_unit_cache(&self, unit: &str) -> Result<UnitCache, DiscoveryError> {
        self.collection.to_unit_cache(unit)
    }

    fn restore(&mut self, unit: &str, data: UnitCache) -> Result<(), DiscoveryError> {
        self.collection = FindingCollection::from_unit_cache(unit, data)?;
        self.restored = true;
        Ok(())
    }

    fn is_restored(&self) -> bool {
        self.restored
    }

    fn reset(&mut self) {
        self.collection.clear();
        self.restored = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        priority: i32,
    }

    fn sample(name: &str, priority: i32) -> Sample {
        Sample {
            name: name.to_string(),
            priority,
        }
    }

    #[test]
    fn test_preserves_insertion_order_across_locations() {
        let app = Location::application("App\\", "/srv/app");
        let vendor = Location::external("Vendor\\Pkg\\", "/srv/vendor/pkg");

        let mut collection = FindingCollection::new();
        collection.push(&app, sample("a", 10));
        collection.push(&vendor, sample("b", 5));
        collection.push(&app, sample("c", 1));

        let names: Vec<_> = collection.findings().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c", "b"]);
        assert_eq!(collection.len(), 3);
        assert_eq!(collection.for_location(&vendor).len(), 1);
        assert!(
            collection
                .for_location(&Location::application("Other\\", "/x"))
                .is_empty()
        );
    }

    #[test]
    fn test_unit_cache_round_trip() {
        let app = Location::application("App\\", "/srv/app");
        let mut collection = FindingCollection::new();
        collection.push(&app, sample("init", 10));

        let cache = collection.to_unit_cache("samples").unwrap();
        assert_eq!(cache.finding_count(), 1);
        assert_eq!(cache.locations[0].findings[0], json!({"name": "init", "priority": 10}));

        let restored = FindingCollection::<Sample>::from_unit_cache("samples", cache).unwrap();
        assert_eq!(restored.for_location(&app), &[sample("init", 10)]);
    }

    #[test]
    fn test_failed_restore_keeps_findings() {
        let app = Location::application("App\\", "/srv/app");
        let mut store = UnitFindings::new();
        store.push(&app, sample("init", 10));

        let bad = UnitCache {
            locations: vec![CachedLocation {
                location: app.clone(),
                findings: vec![json!({"priority": "high"})],
            }],
        };
        assert!(store.restore("samples", bad).is_err());
        assert_eq!(store.count(), 1);
        assert!(!store.is_restored());

        let good = store.to_unit_cache("samples").unwrap();
        store.reset();
        assert_eq!(store.count(), 0);
        store.restore("samples", good).unwrap();
        assert!(store.is_restored());
        assert_eq!(store.collection().for_location(&app), &[sample("init", 10)]);
    }

    #[test]
    fn test_restore_rejects_malformed_records() {
        let cache = UnitCache {
            locations: vec![CachedLocation {
                location: Location::application("App\\", "/srv/app"),
                findings: vec![json!({"name": "init"})],
            }],
        };
        let err = FindingCollection::<Sample>::from_unit_cache("samples", cache).unwrap_err();
        assert!(matches!(err, DiscoveryError::Restore { ref unit, .. } if unit == "samples"));
    }
}
