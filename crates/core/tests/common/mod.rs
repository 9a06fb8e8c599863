#![allow(dead_code)]

use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use trellis_api::{CacheStrategy, Phase};
use trellis_core::cache::DiscoveryCache;
use trellis_core::project::enumerator_from_config;
use trellis_core::units::{
    ContentTypeDiscovery, ExtensionDiscovery, HookDiscovery, RouteDiscovery,
    TemplateControllerDiscovery,
};
use trellis_core::{DiscoveryConfig, DiscoveryRunner};
use trellis_plugin::Container;

/// Throwaway project: `app/` mapped to `App\` in `composer.json`, plus a
/// `classes.json` catalog written on demand.
pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("app")).unwrap();
        fs::write(
            dir.path().join("composer.json"),
            json!({"autoload": {"psr-4": {"App\\": "app/"}}}).to_string(),
        )
        .unwrap();
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn app(&self) -> PathBuf {
        self.root().join("app")
    }

    /// Write `app/<relative>` declaring `class` in its namespace.
    pub fn source(&self, relative: &str, class: &str) {
        let (namespace, short) = class.rsplit_once('\\').unwrap_or(("", class));
        let path = self.app().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            path,
            format!("<?php\n\nnamespace {};\n\nclass {}\n{{\n}}\n", namespace, short),
        )
        .unwrap();
    }

    pub fn catalog(&self, classes: Value) {
        fs::write(
            self.root().join("classes.json"),
            json!({ "classes": classes }).to_string(),
        )
        .unwrap();
    }

    pub fn config(&self, strategy: CacheStrategy) -> DiscoveryConfig {
        DiscoveryConfig::for_project(self.root()).with_strategy(strategy)
    }

    pub fn runner(&self, strategy: CacheStrategy) -> DiscoveryRunner {
        self.runner_with(self.config(strategy), Arc::new(Container::new()))
    }

    pub fn runner_with(&self, config: DiscoveryConfig, container: Arc<Container>) -> DiscoveryRunner {
        let enumerator = enumerator_from_config(&config).unwrap();
        let cache = DiscoveryCache::from_config(&config);
        DiscoveryRunner::builder(config, enumerator, cache)
            .with_unit(Phase::Early, HookDiscovery::new())
            .with_unit(Phase::Early, ContentTypeDiscovery::new())
            .with_unit(Phase::Early, ExtensionDiscovery::new())
            .with_unit(Phase::Main, RouteDiscovery::new())
            .with_unit(Phase::Late, TemplateControllerDiscovery::new(container))
            .build()
            .unwrap()
    }
}

/// A theme with one of every marker kind.
pub fn sample_theme(project: &Project) {
    project.source("Hooks/Setup.php", "App\\Hooks\\Setup");
    project.source("Models/Event.php", "App\\Models\\Event");
    project.source("View/Markdown.php", "App\\View\\Markdown");
    project.source("Api/Events.php", "App\\Api\\Events");
    project.source("Http/SingleController.php", "App\\Http\\SingleController");

    project.catalog(json!([
        {
            "name": "App\\Hooks\\Setup",
            "methods": [
                {"name": "boot", "markers": [{"type": "action", "hook": "init"}]},
                {"name": "title", "markers": [{"type": "filter", "hook": "the_title", "priority": 20, "accepted_args": 2}]}
            ]
        },
        {
            "name": "App\\Models\\Event",
            "capabilities": ["ContentModel"],
            "markers": [{"type": "content_type", "name": "event", "has_archive": true}]
        },
        {
            "name": "App\\View\\Markdown",
            "capabilities": ["RenderingExtension"],
            "markers": [{"type": "rendering_extension", "priority": 5}]
        },
        {
            "name": "App\\Api\\Events",
            "methods": [
                {"name": "index", "markers": [{"type": "route", "namespace": "theme/v1", "path": "/events"}]}
            ]
        },
        {
            "name": "App\\Http\\SingleController",
            "capabilities": ["TemplateController"],
            "markers": [{"type": "template_controller", "templates": ["single", "single-event"]}]
        }
    ]));
}
