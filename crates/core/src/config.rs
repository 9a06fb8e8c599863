//! Project-level discovery configuration.
//!
//! Read from `<project>/trellis.json` when present; every field has a default.
//! `TRELLIS_CACHE_STRATEGY` and `TRELLIS_DEBUG` override the file.

use crate::error::{Result, TrellisError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use trellis_api::{CacheStrategy, ClassName};

pub const CONFIG_FILE: &str = "trellis.json";
pub const ENV_CACHE_STRATEGY: &str = "TRELLIS_CACHE_STRATEGY";
pub const ENV_DEBUG: &str = "TRELLIS_DEBUG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Directory every relative path below resolves against.
    #[serde(skip)]
    pub project_root: PathBuf,
    /// Application code scanned for markers.
    pub app_dir: PathBuf,
    /// JSON manifest holding the `autoload.psr-4` module map.
    pub module_manifest: PathBuf,
    /// JSON class catalog declaring classes and their markers.
    pub class_catalog: PathBuf,
    pub cache_dir: PathBuf,
    pub cache_strategy: CacheStrategy,
    /// Classes outside the scanned tree that are discovered explicitly.
    pub opt_in_classes: Vec<ClassName>,
    pub default_namespace: String,
    pub source_extension: String,
    pub debug: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            app_dir: PathBuf::from("app"),
            module_manifest: PathBuf::from("composer.json"),
            class_catalog: PathBuf::from("classes.json"),
            cache_dir: PathBuf::from(".trellis/cache"),
            cache_strategy: CacheStrategy::None,
            opt_in_classes: Vec::new(),
            default_namespace: "App\\".to_string(),
            source_extension: "php".to_string(),
            debug: false,
        }
    }
}

impl DiscoveryConfig {
    pub fn for_project(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            ..Self::default()
        }
    }

    /// Load `trellis.json` from the project root and apply environment overrides.
    pub fn load(project_root: &Path) -> Result<Self> {
        let file = project_root.join(CONFIG_FILE);
        let mut config = if file.is_file() {
            let raw = fs::read_to_string(&file)?;
            serde_json::from_str::<DiscoveryConfig>(&raw).map_err(|e| {
                TrellisError::Config(format!("{}: {}", file.display(), e))
            })?
        } else {
            DiscoveryConfig::default()
        };
        config.project_root = project_root.to_path_buf();
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in production).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(strategy) = lookup(ENV_CACHE_STRATEGY) {
            self.cache_strategy = strategy.parse()?;
        }
        if let Some(debug) = lookup(ENV_DEBUG) {
            self.debug = matches!(
                debug.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
        Ok(())
    }

    pub fn with_strategy(mut self, strategy: CacheStrategy) -> Self {
        self.cache_strategy = strategy;
        self
    }

    pub fn with_opt_in(mut self, class: impl Into<ClassName>) -> Self {
        self.opt_in_classes.push(class.into());
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_root.join(path)
        }
    }

    pub fn app_path(&self) -> PathBuf {
        self.resolve(&self.app_dir)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.resolve(&self.module_manifest)
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.resolve(&self.class_catalog)
    }

    pub fn cache_path(&self) -> PathBuf {
        self.resolve(&self.cache_dir)
    }
}
