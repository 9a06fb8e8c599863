//! Class enumeration: filesystem location → inspectable class definitions.

use super::catalog::ClassCatalog;
use super::module_map::ModuleMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Component, Path};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use trellis_api::{ClassDefinition, ClassKind, ClassName, Location};
use walkdir::WalkDir;

static NAMESPACE_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*namespace\s+([A-Za-z_][A-Za-z0-9_\\]*)\s*[;{]").unwrap());

static TYPE_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^\s*(?:(?:abstract|final|readonly)\s+)*(?:class|interface|trait|enum)\s+([A-Za-z_][A-Za-z0-9_]*)",
    )
    .unwrap()
});

const PACKAGE_DIR: &str = "vendor";

/// Why a named class could not be turned into a scan target.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("class {0} is not declared in the class catalog")]
    Unknown(ClassName),
    #[error("{class} cannot be instantiated ({})", .kind.as_str())]
    NotInstantiable { class: ClassName, kind: ClassKind },
}

pub struct ClassEnumerator {
    module_map: ModuleMap,
    catalog: Arc<ClassCatalog>,
    default_namespace: String,
    extension: String,
}

impl ClassEnumerator {
    pub fn new(module_map: ModuleMap, catalog: Arc<ClassCatalog>) -> Self {
        Self {
            module_map,
            catalog,
            default_namespace: "App\\".to_string(),
            extension: "php".to_string(),
        }
    }

    pub fn with_default_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.default_namespace = namespace.into();
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn catalog(&self) -> &ClassCatalog {
        &self.catalog
    }

    /// Canonicalize `root` and find the namespace prefix that owns it.
    ///
    /// Returns `None` when the directory does not exist.
    pub fn resolve_location(&self, root: &Path) -> Option<Location> {
        let root = fs::canonicalize(root).ok()?;
        if !root.is_dir() {
            return None;
        }
        let prefix = self
            .module_map
            .owning_prefix(&root)
            .unwrap_or_else(|| self.default_namespace.clone());
        let external = is_package_path(&root);
        Some(Location::new(prefix, root, external))
    }

    /// Walk the location and collect every concrete class declared in the catalog.
    ///
    /// Files are visited in file-name order so that scans are reproducible.
    /// Files that cannot be mapped or read are skipped.
    pub fn scan(&self, location: &Location) -> Vec<Arc<ClassDefinition>> {
        let start = std::time::Instant::now();
        let mut classes = Vec::new();
        let mut files = 0usize;

        for entry in WalkDir::new(&location.root_path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(self.extension.as_str()) {
                continue;
            }
            files += 1;

            let Some(name) = self.class_name_for(path) else {
                debug!("Skipping {}: no class declaration", path.display());
                continue;
            };

            match self.resolve_class(&name) {
                Ok(class) => classes.push(class),
                Err(e) => debug!("Skipping {}: {}", path.display(), e),
            }
        }

        info!(
            "Scanned {}: {} source files, {} classes in {:?}",
            location,
            files,
            classes.len(),
            start.elapsed()
        );
        classes
    }

    /// Look a class up in the catalog; only concrete classes resolve.
    pub fn resolve_class(&self, name: &ClassName) -> Result<Arc<ClassDefinition>, ResolutionError> {
        let class = self
            .catalog
            .get(name)
            .ok_or_else(|| ResolutionError::Unknown(name.clone()))?;
        if !class.is_concrete() {
            return Err(ResolutionError::NotInstantiable {
                class: name.clone(),
                kind: class.kind,
            });
        }
        Ok(class)
    }

    /// Location attributed to a class discovered outside the scanned tree.
    pub fn location_of(&self, class: &ClassDefinition) -> Location {
        let namespace = class.name.namespace();
        let prefix = if namespace.is_empty() {
            String::new()
        } else {
            format!("{}{}", namespace, ClassName::SEPARATOR)
        };
        match class.file.as_deref().and_then(Path::parent) {
            Some(dir) => Location::new(prefix, dir, is_package_path(dir)),
            None => Location::external(prefix, ""),
        }
    }

    fn class_name_for(&self, path: &Path) -> Option<ClassName> {
        if let Some(name) = self.module_map.class_for_file(path) {
            return Some(name);
        }
        let source = fs::read_to_string(path)
            .map_err(|e| debug!("Cannot read {}: {}", path.display(), e))
            .ok()?;
        declared_class(&source)
    }
}

/// Parse the declared namespace and first type name from a source file.
pub fn declared_class(source: &str) -> Option<ClassName> {
    let name = TYPE_DECL.captures(source)?.get(1)?.as_str();
    let namespace = NAMESPACE_DECL
        .captures(source)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or("");
    Some(ClassName::join(namespace, name))
}

fn is_package_path(path: &Path) -> bool {
    path.components()
        .any(|c| matches!(c, Component::Normal(part) if part == PACKAGE_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_class() {
        let source = "<?php\n\nnamespace App\\Hooks;\n\nuse Foo\\Bar;\n\nfinal class ThemeSetup extends Bar\n{\n}\n";
        assert_eq!(
            declared_class(source),
            Some(ClassName::new("App\\Hooks\\ThemeSetup"))
        );

        let global = "<?php\nabstract class Base {}\n";
        assert_eq!(declared_class(global), Some(ClassName::new("Base")));

        assert_eq!(declared_class("<?php\nreturn [];\n"), None);
    }

    #[test]
    fn test_resolve_location_missing_root() {
        let enumerator = ClassEnumerator::new(ModuleMap::new(), Arc::new(ClassCatalog::new()));
        assert!(enumerator.resolve_location(Path::new("/no/such/dir")).is_none());
    }

    #[test]
    fn test_resolve_location_falls_back_to_default_prefix() {
        let temp = tempfile::tempdir().unwrap();
        let enumerator = ClassEnumerator::new(ModuleMap::new(), Arc::new(ClassCatalog::new()))
            .with_default_namespace("Theme\\");

        let location = enumerator.resolve_location(temp.path()).unwrap();
        assert_eq!(location.namespace_prefix, "Theme\\");
        assert!(!location.is_external_package);
        assert_eq!(location.root_path, fs::canonicalize(temp.path()).unwrap());
    }

    #[test]
    fn test_package_location() {
        let temp = tempfile::tempdir().unwrap();
        let pkg = temp.path().join("vendor/acme/blocks");
        fs::create_dir_all(&pkg).unwrap();
        let enumerator = ClassEnumerator::new(ModuleMap::new(), Arc::new(ClassCatalog::new()));

        assert!(enumerator.resolve_location(&pkg).unwrap().is_external_package);
    }

    #[test]
    fn test_resolve_class_rejects_non_concrete() {
        let catalog = ClassCatalog::from_definitions([
            ClassDefinition::new("App\\Contract").with_kind(ClassKind::Interface),
            ClassDefinition::new("App\\Service"),
        ]);
        let enumerator = ClassEnumerator::new(ModuleMap::new(), Arc::new(catalog));

        assert!(enumerator.resolve_class(&ClassName::new("App\\Service")).is_ok());
        assert_eq!(
            enumerator.resolve_class(&ClassName::new("App\\Contract")).unwrap_err(),
            ResolutionError::NotInstantiable {
                class: ClassName::new("App\\Contract"),
                kind: ClassKind::Interface,
            }
        );
        assert_eq!(
            enumerator.resolve_class(&ClassName::new("App\\Missing")).unwrap_err(),
            ResolutionError::Unknown(ClassName::new("App\\Missing"))
        );
    }
}
