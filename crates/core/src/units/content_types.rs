//! Content type markers → content type registration plus class-map entry.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use trellis_api::{
    CacheScope, ClassDefinition, ClassName, ContentTypeMarker, ContentTypeRegistration,
    HostRegistry, Location, MarkerType,
};
use trellis_plugin::{DiscoveryError, DiscoveryUnit, FindingStore, UnitFindings};

/// Capability a content model class must implement.
pub const CONTENT_MODEL: &str = "ContentModel";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentTypeFinding {
    pub class_name: ClassName,
    pub content_type: ContentTypeMarker,
}

impl ContentTypeFinding {
    pub fn registration(&self) -> ContentTypeRegistration {
        let marker = &self.content_type;
        let singular = marker
            .singular
            .clone()
            .unwrap_or_else(|| humanize(&marker.name));
        let plural = marker
            .plural
            .clone()
            .unwrap_or_else(|| format!("{}s", singular));

        let mut args = Map::new();
        args.insert(
            "labels".into(),
            json!({ "name": plural, "singular_name": singular }),
        );
        args.insert("public".into(), Value::Bool(marker.public));
        args.insert("has_archive".into(), Value::Bool(marker.has_archive));
        args.insert("supports".into(), json!(marker.supports));
        if let Some(icon) = &marker.menu_icon {
            args.insert("menu_icon".into(), Value::String(icon.clone()));
        }
        if let Some(slug) = &marker.rewrite_slug {
            args.insert("rewrite".into(), json!({ "slug": slug }));
        }
        if !marker.taxonomies.is_empty() {
            args.insert("taxonomies".into(), json!(marker.taxonomies));
        }

        ContentTypeRegistration {
            name: marker.name.clone(),
            args,
        }
    }
}

/// `event_venue` → `Event venue`
fn humanize(name: &str) -> String {
    let spaced = name.replace(['_', '-'], " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Default)]
pub struct ContentTypeDiscovery {
    findings: UnitFindings<ContentTypeFinding>,
}

impl ContentTypeDiscovery {
    pub const ID: &'static str = "content_types";

    pub fn new() -> Self {
        Self::default()
    }
}

impl DiscoveryUnit for ContentTypeDiscovery {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn cache_scope(&self) -> CacheScope {
        CacheScope::Core
    }

    fn discover(&mut self, location: &Location, class: &ClassDefinition) -> Result<(), DiscoveryError> {
        let Some(marker) = class.typed::<ContentTypeMarker>() else {
            return Ok(());
        };
        if !class.implements(CONTENT_MODEL) {
            return Err(DiscoveryError::missing_capability(
                &class.name,
                ContentTypeMarker::KIND,
                CONTENT_MODEL,
            ));
        }
        self.findings.push(
            location,
            ContentTypeFinding {
                class_name: class.name.clone(),
                content_type: marker.clone(),
            },
        );
        Ok(())
    }

    fn apply(&mut self, host: &mut dyn HostRegistry) {
        for finding in self.findings.findings() {
            host.register_content_type(finding.registration());
            host.register_class_map(&finding.content_type.name, finding.class_name.clone());
        }
    }

    fn store(&self) -> &dyn FindingStore {
        &self.findings
    }

    fn store_mut(&mut self) -> &mut dyn FindingStore {
        &mut self.findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostCall, RecordingHost};

    #[test]
    fn test_registration_arguments() {
        let finding = ContentTypeFinding {
            class_name: ClassName::new("App\\Models\\Event"),
            content_type: ContentTypeMarker::new("event_venue").with_archive(),
        };
        let registration = finding.registration();

        assert_eq!(registration.name, "event_venue");
        assert_eq!(
            registration.args["labels"],
            json!({"name": "Event venues", "singular_name": "Event venue"})
        );
        assert_eq!(registration.args["has_archive"], json!(true));
        assert!(!registration.args.contains_key("rewrite"));
    }

    #[test]
    fn test_requires_content_model() {
        let class = ClassDefinition::new("App\\Models\\Event")
            .with_marker(ContentTypeMarker::new("event"));

        let mut unit = ContentTypeDiscovery::new();
        let err = unit
            .discover(&Location::application("App\\", "/srv/app"), &class)
            .unwrap_err();
        assert!(err.to_string().contains("does not implement ContentModel"));
    }

    #[test]
    fn test_apply_registers_type_then_class_map() {
        let class = ClassDefinition::new("App\\Models\\Event")
            .implementing(CONTENT_MODEL)
            .with_marker(ContentTypeMarker::new("event").labels("Event", "Events"));

        let mut unit = ContentTypeDiscovery::new();
        unit.discover(&Location::application("App\\", "/srv/app"), &class)
            .unwrap();

        let mut host = RecordingHost::new();
        unit.apply(&mut host);
        assert!(matches!(&host.calls()[0], HostCall::RegisterContentType(r) if r.name == "event"));
        assert_eq!(
            host.calls()[1],
            HostCall::RegisterClassMap {
                content_type: "event".into(),
                class: ClassName::new("App\\Models\\Event"),
            }
        );
    }
}
