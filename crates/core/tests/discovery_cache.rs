mod common;

use common::{Project, sample_theme};
use serde_json::json;
use std::fs;
use std::sync::Arc;
use trellis_api::{CacheStrategy, Phase, StaticRequest, TemplateContext, TemplateController};
use trellis_core::cache::DiscoveryCache;
use trellis_core::{DiscoveryRunner, RecordingHost};
use trellis_plugin::Container;

fn run_all(runner: &mut DiscoveryRunner) -> RecordingHost {
    let mut host = RecordingHost::new();
    for phase in Phase::ALL {
        runner.run_phase(phase, &mut host).unwrap();
    }
    host
}

#[test]
fn test_restored_findings_register_identically() {
    let project = Project::new();
    sample_theme(&project);

    let mut warm_host = RecordingHost::new();
    let report = project.runner(CacheStrategy::Full).warm(&mut warm_host).unwrap();
    assert_eq!(report.stored_units, Some(5));
    assert_eq!(report.total_findings(), 6);

    let mut cached = project.runner(CacheStrategy::Full);
    let cached_host = run_all(&mut cached);
    assert!(cached.unit_summaries().iter().all(|s| s.restored));

    assert_eq!(cached_host.calls(), warm_host.calls());
}

struct Echo(&'static str);

impl TemplateController for Echo {
    fn render(&self, context: &TemplateContext) -> Option<String> {
        Some(format!("{}:{}", self.0, context.template_type))
    }
}

fn controllers() -> Arc<Container> {
    let mut container = Container::new();
    container.bind::<dyn TemplateController>("App\\Http\\EventController", Arc::new(Echo("event")));
    container.bind::<dyn TemplateController>("App\\Http\\SingleController", Arc::new(Echo("single")));
    Arc::new(container)
}

#[test]
fn test_restored_templates_resolve_identically() {
    let project = Project::new();
    project.source("Http/EventController.php", "App\\Http\\EventController");
    project.source("Http/SingleController.php", "App\\Http\\SingleController");
    // EventController is scanned first; SingleController only wins
    // `single-event` through its higher priority.
    project.catalog(json!([
        {
            "name": "App\\Http\\EventController",
            "capabilities": ["TemplateController"],
            "markers": [{"type": "template_controller", "templates": ["single-event", "archive-*"], "priority": 1}]
        },
        {
            "name": "App\\Http\\SingleController",
            "capabilities": ["TemplateController"],
            "markers": [{"type": "template_controller", "templates": ["single", "single-event"]}]
        }
    ]));

    let mut warm_host = RecordingHost::new();
    project
        .runner_with(project.config(CacheStrategy::Full), controllers())
        .warm(&mut warm_host)
        .unwrap();

    let mut cached = project.runner_with(project.config(CacheStrategy::Full), controllers());
    let cached_host = run_all(&mut cached);
    assert!(cached.unit_summaries().iter().all(|s| s.restored));

    let requests = [
        StaticRequest::singular("event", 1, "launch"),
        StaticRequest::singular("post", 2, "hello"),
        StaticRequest::post_type_archive("event"),
        StaticRequest::singular("page", 3, "about"),
    ];
    for request in &requests {
        assert_eq!(
            cached_host.intercept("/theme/index.php", request),
            warm_host.intercept("/theme/index.php", request)
        );
    }

    let resolve = |request: &StaticRequest| {
        cached_host
            .intercept("/theme/index.php", request)
            .and_then(|outcome| outcome.body().map(str::to_string))
    };
    assert_eq!(resolve(&requests[0]).as_deref(), Some("single:single-event"));
    assert_eq!(resolve(&requests[1]).as_deref(), Some("single:single"));
    assert_eq!(resolve(&requests[2]).as_deref(), Some("event:archive-event"));
    assert_eq!(resolve(&requests[3]), None);
}

#[test]
fn test_restore_does_not_touch_the_catalog() {
    let project = Project::new();
    sample_theme(&project);
    project.runner(CacheStrategy::Full).warm(&mut RecordingHost::new()).unwrap();

    // Findings come from the cache even after the catalog disappears.
    fs::remove_file(project.root().join("classes.json")).unwrap();
    let mut runner = project.runner(CacheStrategy::Full);
    let host = run_all(&mut runner);
    assert_eq!(host.callbacks_for("init").len(), 1);
}

#[test]
fn test_strategy_change_disables_cache() {
    let project = Project::new();
    sample_theme(&project);
    project.runner(CacheStrategy::Full).warm(&mut RecordingHost::new()).unwrap();

    let config = project.config(CacheStrategy::Partial);
    let cache = DiscoveryCache::from_config(&config);
    assert!(cache.exists());
    assert!(!cache.is_enabled());
    assert!(cache.restore().is_none());

    let status = cache.status();
    assert!(!status.valid);
    assert_eq!(status.stored_strategy, Some(CacheStrategy::Full));

    let mut runner = project.runner(CacheStrategy::Partial);
    runner.discover().unwrap();
    assert!(runner.unit_summaries().iter().all(|s| !s.restored));
}

#[test]
fn test_corrupt_data_file_falls_back_to_scanning() {
    let project = Project::new();
    sample_theme(&project);
    let runner = project.runner(CacheStrategy::Full);
    let data_path = runner.cache().data_path();
    drop(runner);

    project.runner(CacheStrategy::Full).warm(&mut RecordingHost::new()).unwrap();
    fs::write(&data_path, b"not messagepack").unwrap();

    let mut runner = project.runner(CacheStrategy::Full);
    assert!(runner.cache().is_enabled());
    assert!(runner.cache().restore().is_none());

    let host = run_all(&mut runner);
    assert_eq!(host.len(), 7);
    assert!(runner.unit_summaries().iter().all(|s| !s.restored));
}

#[test]
fn test_warm_on_empty_application() {
    let project = Project::new();

    let mut runner = project.runner(CacheStrategy::Full);
    let mut host = RecordingHost::new();
    let report = runner.warm(&mut host).unwrap();

    assert_eq!(report.total_findings(), 0);
    assert_eq!(report.stored_units, Some(0));
    assert!(host.is_empty());

    let envelope = runner.cache().restore().unwrap();
    assert!(envelope.is_empty());
}

#[test]
fn test_clear_then_status() {
    let project = Project::new();
    sample_theme(&project);
    let mut runner = project.runner(CacheStrategy::Partial);
    runner.warm(&mut RecordingHost::new()).unwrap();
    assert!(runner.cache().status().valid);

    assert!(runner.cache().clear().unwrap());
    let status = runner.cache().status();
    assert!(!status.enabled);
    assert!(!status.exists);
    assert_eq!(status.stored_strategy, None);
}
