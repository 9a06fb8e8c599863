//! Project layout: module map, class catalog and class enumeration.

pub mod catalog;
pub mod module_map;
pub mod scanner;

pub use catalog::ClassCatalog;
pub use module_map::ModuleMap;
pub use scanner::{ClassEnumerator, ResolutionError};

use crate::config::DiscoveryConfig;
use crate::error::Result;
use std::sync::Arc;

/// Build the enumerator described by a configuration: module map from the
/// manifest, classes from the catalog file.
pub fn enumerator_from_config(config: &DiscoveryConfig) -> Result<ClassEnumerator> {
    let module_map = ModuleMap::from_manifest(&config.manifest_path())?;
    let catalog = ClassCatalog::load(&config.catalog_path())?;
    Ok(enumerator_with_catalog(config, module_map, Arc::new(catalog)))
}

pub fn enumerator_with_catalog(
    config: &DiscoveryConfig,
    module_map: ModuleMap,
    catalog: Arc<ClassCatalog>,
) -> ClassEnumerator {
    ClassEnumerator::new(module_map, catalog)
        .with_default_namespace(config.default_namespace.clone())
        .with_extension(config.source_extension.clone())
}
