//! Class catalog: the table of declared classes and their markers.

use crate::error::{Result, TrellisError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use trellis_api::{ClassDefinition, ClassName};

#[derive(Debug, Serialize, Deserialize)]
struct CatalogManifest {
    #[serde(default)]
    classes: Vec<ClassDefinition>,
}

#[derive(Debug, Clone, Default)]
pub struct ClassCatalog {
    classes: IndexMap<ClassName, Arc<ClassDefinition>>,
}

impl ClassCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_definitions(definitions: impl IntoIterator<Item = ClassDefinition>) -> Self {
        let mut catalog = Self::new();
        for definition in definitions {
            catalog.insert(definition);
        }
        catalog
    }

    /// Load a JSON catalog (`{"classes": [...]}`). A missing file yields an empty catalog.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            tracing::debug!("No class catalog at {}", path.display());
            return Ok(Self::new());
        }
        let raw = fs::read_to_string(path)?;
        let manifest: CatalogManifest = serde_json::from_str(&raw)
            .map_err(|e| TrellisError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(Self::from_definitions(manifest.classes))
    }

    /// Later definitions replace earlier ones with the same name.
    pub fn insert(&mut self, definition: ClassDefinition) {
        self.classes
            .insert(definition.name.clone(), Arc::new(definition));
    }

    pub fn get(&self, name: &ClassName) -> Option<Arc<ClassDefinition>> {
        self.classes.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ClassDefinition>> {
        self.classes.values()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
