//! Action and filter markers → `add_action` / `add_filter`.

use serde::{Deserialize, Serialize};
use trellis_api::host::INVOKE_METHOD;
use trellis_api::{
    CacheScope, ClassDefinition, ClassName, HookMarker, HostRegistry, Location, Marker,
    MarkerKind, MethodCallback,
};
use trellis_plugin::{DiscoveryError, DiscoveryUnit, FindingStore, UnitFindings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookKind {
    Action,
    Filter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookFinding {
    pub kind: HookKind,
    pub hook: String,
    pub class_name: ClassName,
    pub method_name: String,
    pub priority: i32,
    pub accepted_args: u32,
}

impl HookFinding {
    fn new(kind: HookKind, marker: &HookMarker, class: &ClassName, method: &str) -> Self {
        Self {
            kind,
            hook: marker.hook.clone(),
            class_name: class.clone(),
            method_name: method.to_string(),
            priority: marker.priority,
            accepted_args: marker.accepted_args,
        }
    }
}

#[derive(Default)]
pub struct HookDiscovery {
    findings: UnitFindings<HookFinding>,
}

impl HookDiscovery {
    pub const ID: &'static str = "hooks";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn findings(&self) -> &UnitFindings<HookFinding> {
        &self.findings
    }
}

fn hook_markers(markers: &[Marker]) -> impl Iterator<Item = (HookKind, &HookMarker)> {
    markers.iter().filter_map(|marker| match marker {
        Marker::Action(m) => Some((HookKind::Action, m)),
        Marker::Filter(m) => Some((HookKind::Filter, m)),
        _ => None,
    })
}

impl DiscoveryUnit for HookDiscovery {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn cache_scope(&self) -> CacheScope {
        CacheScope::Core
    }

    fn discover(&mut self, location: &Location, class: &ClassDefinition) -> Result<(), DiscoveryError> {
        // Class-level markers dispatch to the invokable method.
        let mut class_level = hook_markers(&class.markers).peekable();
        if let Some((kind, _)) = class_level.peek() {
            let invokable = class.method(INVOKE_METHOD).is_some_and(|m| m.public);
            if !invokable {
                let marker = match kind {
                    HookKind::Action => MarkerKind::Action,
                    HookKind::Filter => MarkerKind::Filter,
                };
                return Err(DiscoveryError::Configuration {
                    class: class.name.clone(),
                    marker,
                    requirement: format!("has no public {} method", INVOKE_METHOD),
                });
            }
        }
        for (kind, marker) in class_level {
            self.findings.push(
                location,
                HookFinding::new(kind, marker, &class.name, INVOKE_METHOD),
            );
        }

        for method in class.public_methods() {
            for (kind, marker) in hook_markers(&method.markers) {
                self.findings.push(
                    location,
                    HookFinding::new(kind, marker, &class.name, &method.name),
                );
            }
        }
        Ok(())
    }

    fn apply(&mut self, host: &mut dyn HostRegistry) {
        for finding in self.findings.findings() {
            let callback = MethodCallback::new(finding.class_name.clone(), finding.method_name.clone());
            match finding.kind {
                HookKind::Action => {
                    host.add_action(&finding.hook, callback, finding.priority, finding.accepted_args)
                }
                HookKind::Filter => {
                    host.add_filter(&finding.hook, callback, finding.priority, finding.accepted_args)
                }
            }
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
    use trellis_api::MethodDefinition;

    fn app() -> Location {
        Location::application("App\\", "/srv/app")
    }

    #[test]
    fn test_method_markers_become_registrations() {
        let class = ClassDefinition::new("App\\Hooks\\ThemeSetup")
            .with_method(
                MethodDefinition::new("boot").with_marker(Marker::Action(
                    HookMarker::new("after_setup_theme").priority(5),
                )),
            )
            .with_method(
                MethodDefinition::new("title")
                    .with_marker(Marker::Filter(HookMarker::new("the_title").accepted_args(2))),
            )
            .with_method(MethodDefinition::new("hidden").private().with_marker(Marker::action("init")));

        let mut unit = HookDiscovery::new();
        unit.discover(&app(), &class).unwrap();
        assert_eq!(unit.item_count(), 2);

        let mut host = RecordingHost::new();
        unit.apply(&mut host);
        assert_eq!(
            host.calls(),
            &[
                HostCall::AddAction {
                    hook: "after_setup_theme".into(),
                    callback: MethodCallback::new("App\\Hooks\\ThemeSetup", "boot"),
                    priority: 5,
                    accepted_args: 1,
                },
                HostCall::AddFilter {
                    hook: "the_title".into(),
                    callback: MethodCallback::new("App\\Hooks\\ThemeSetup", "title"),
                    priority: 10,
                    accepted_args: 2,
                },
            ]
        );
    }

    #[test]
    fn test_class_level_marker_requires_invoke() {
        let class = ClassDefinition::new("App\\Hooks\\Broken").with_marker(Marker::action("init"));

        let mut unit = HookDiscovery::new();
        let err = unit.discover(&app(), &class).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("App\\Hooks\\Broken"));
        assert!(err.to_string().contains("__invoke"));
        assert!(!unit.has_items());
    }

    #[test]
    fn test_class_level_marker_with_invoke() {
        let class = ClassDefinition::new("App\\Hooks\\Init")
            .with_marker(Marker::action("init"))
            .with_method(MethodDefinition::new(INVOKE_METHOD));

        let mut unit = HookDiscovery::new();
        unit.discover(&app(), &class).unwrap();

        let finding = unit.findings().findings().next().unwrap();
        assert_eq!(finding.method_name, INVOKE_METHOD);
        assert_eq!(finding.hook, "init");
    }

    #[test]
    fn test_unmarked_class_is_ignored() {
        let mut unit = HookDiscovery::new();
        unit.discover(&app(), &ClassDefinition::new("App\\Plain")).unwrap();
        assert!(!unit.has_items());
    }
}
