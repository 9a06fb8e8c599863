mod common;

use common::{Project, sample_theme};
use std::sync::Arc;
use trellis_api::{
    CacheStrategy, Conditional, QueriedObject, StaticRequest, TemplateContext, TemplateController,
    TemplateOutcome,
};
use trellis_core::RecordingHost;
use trellis_plugin::Container;

struct Named(&'static str);

impl TemplateController for Named {
    fn render(&self, context: &TemplateContext) -> Option<String> {
        let title = context
            .post
            .as_ref()
            .and_then(|post| post.get("title"))
            .and_then(|title| title.as_str())
            .unwrap_or("untitled");
        Some(format!("{}:{}:{}", self.0, context.template_type, title))
    }
}

fn themed_host() -> (Project, RecordingHost) {
    let project = Project::new();
    sample_theme(&project);

    let mut container = Container::new();
    container.bind::<dyn TemplateController>("App\\Http\\SingleController", Arc::new(Named("single")));

    let mut runner = project.runner_with(project.config(CacheStrategy::None), Arc::new(container));
    let mut host = RecordingHost::new();
    runner.run_late(&mut host).unwrap();
    (project, host)
}

#[test]
fn test_most_specific_registered_type_wins() {
    let (_project, host) = themed_host();

    let event = StaticRequest::singular("event", 12, "launch")
        .context_value("post", serde_json::json!({"title": "Launch"}));
    let outcome = host.intercept("/theme/single.php", &event).unwrap();
    assert_eq!(outcome.body(), Some("single:single-event:Launch"));
    assert_eq!(outcome.template(), "");

    let post = StaticRequest::singular("post", 3, "hello");
    let outcome = host.intercept("/theme/single.php", &post).unwrap();
    assert_eq!(outcome.body(), Some("single:single:untitled"));
}

#[test]
fn test_unmatched_request_keeps_host_template() {
    let (_project, host) = themed_host();

    let request = StaticRequest::new()
        .with(Conditional::Archive)
        .with(Conditional::Category)
        .queried(QueriedObject::term(4, "category", "news"));
    let outcome = host.intercept("/theme/archive.php", &request).unwrap();
    assert_eq!(
        outcome,
        TemplateOutcome::Deferred {
            template: "/theme/archive.php".into()
        }
    );
}

#[test]
fn test_unbound_controller_defers() {
    let project = Project::new();
    sample_theme(&project);
    let mut runner = project.runner(CacheStrategy::None);
    let mut host = RecordingHost::new();
    runner.run_late(&mut host).unwrap();

    let outcome = host
        .intercept("/theme/single.php", &StaticRequest::singular("event", 1, "x"))
        .unwrap();
    assert!(!outcome.is_handled());
    assert_eq!(outcome.template(), "/theme/single.php");
}
