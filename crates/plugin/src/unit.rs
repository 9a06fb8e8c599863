use crate::envelope::UnitCache;
use crate::error::DiscoveryError;
use crate::finding::FindingStore;
use trellis_api::{CacheScope, ClassDefinition, HostRegistry, Location};

/// One marker type mapped to host registrations.
///
/// The runner calls `discover` for every scanned class (or `restore_from_cache`
/// instead), then `apply` once in the unit's phase.
pub trait DiscoveryUnit {
    /// Stable identifier, also the key in the cache envelope.
    fn id(&self) -> &'static str;

    fn cache_scope(&self) -> CacheScope {
        CacheScope::Extended
    }

    /// Inspect a class for this unit's marker and record findings.
    ///
    /// Returns [`DiscoveryError::Configuration`] when a marked class breaks a
    /// structural requirement; the runner does not recover from it.
    fn discover(&mut self, location: &Location, class: &ClassDefinition) -> Result<(), DiscoveryError>;

    /// Turn every stored finding into host registrations.
    fn apply(&mut self, host: &mut dyn HostRegistry);

    /// The unit's findings; the cache-facing defaults below work through it.
    fn store(&self) -> &dyn FindingStore;

    fn store_mut(&mut self) -> &mut dyn FindingStore;

    fn item_count(&self) -> usize {
        self.store().count()
    }

    fn has_items(&self) -> bool {
        self.item_count() > 0
    }

    fn cacheable_data(&self) -> Result<UnitCache, DiscoveryError> {
        self.store().to_unit_cache(self.id())
    }

    /// Replace the unit's findings with cached ones. On error the unit is left unchanged.
    fn restore_from_cache(&mut self, data: UnitCache) -> Result<(), DiscoveryError> {
        let id = self.id();
        self.store_mut().restore(id, data)
    }

    fn was_restored_from_cache(&self) -> bool {
        self.store().is_restored()
    }

    /// Drop all findings and the restored flag.
    fn reset(&mut self) {
        self.store_mut().reset();
    }
}
