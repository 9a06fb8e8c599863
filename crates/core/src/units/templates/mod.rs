//! Template controller markers and request-time template resolution.

mod dispatcher;
pub mod hierarchy;
mod registry;

pub use dispatcher::TemplateDispatcher;
pub use registry::{HandlerEntry, TemplateRegistry};

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use trellis_api::{
    ClassDefinition, ClassName, HostRegistry, Location, MarkerType, TemplateControllerMarker,
};
use trellis_plugin::{Container, DiscoveryError, DiscoveryUnit, FindingStore, UnitFindings};

/// Capability a template handler class must implement.
pub const TEMPLATE_CONTROLLER: &str = "TemplateController";

/// Priority of the single template interception callback.
pub const INTERCEPT_PRIORITY: i32 = 99;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateFinding {
    pub class_name: ClassName,
    pub templates: Vec<String>,
    pub priority: i32,
}

pub struct TemplateControllerDiscovery {
    findings: UnitFindings<TemplateFinding>,
    container: Arc<Container>,
    registry: Option<Arc<TemplateRegistry>>,
}

impl TemplateControllerDiscovery {
    pub const ID: &'static str = "templates";

    pub fn new(container: Arc<Container>) -> Self {
        Self {
            findings: UnitFindings::new(),
            container,
            registry: None,
        }
    }

    /// Registry built by the last `apply`.
    pub fn registry(&self) -> Option<&TemplateRegistry> {
        self.registry.as_deref()
    }

    fn build_registry(&self) -> TemplateRegistry {
        let mut registry = TemplateRegistry::new();
        for finding in self.findings.findings() {
            for template in &finding.templates {
                registry.register(template, &finding.class_name, finding.priority);
            }
        }
        registry
    }
}

impl DiscoveryUnit for TemplateControllerDiscovery {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn discover(&mut self, location: &Location, class: &ClassDefinition) -> Result<(), DiscoveryError> {
        let Some(marker) = class.typed::<TemplateControllerMarker>() else {
            return Ok(());
        };
        if !class.implements(TEMPLATE_CONTROLLER) {
            return Err(DiscoveryError::missing_capability(
                &class.name,
                TemplateControllerMarker::KIND,
                TEMPLATE_CONTROLLER,
            ));
        }
        let templates: Vec<String> = marker
            .templates
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        if templates.is_empty() {
            return Err(DiscoveryError::Configuration {
                class: class.name.clone(),
                marker: TemplateControllerMarker::KIND,
                requirement: "names no templates".into(),
            });
        }
        self.findings.push(
            location,
            TemplateFinding {
                class_name: class.name.clone(),
                templates,
                priority: marker.priority,
            },
        );
        Ok(())
    }

    fn apply(&mut self, host: &mut dyn HostRegistry) {
        if !self.has_items() {
            debug!("No template controllers; template selection left untouched");
            return;
        }
        let registry = Arc::new(self.build_registry());
        host.intercept_template(
            Arc::new(TemplateDispatcher::new(registry.clone(), self.container.clone())),
            INTERCEPT_PRIORITY,
        );
        self.registry = Some(registry);
    }

    fn store(&self) -> &dyn FindingStore {
        &self.findings
    }

    fn store_mut(&mut self) -> &mut dyn FindingStore {
        &mut self.findings
    }

    fn reset(&mut self) {
        self.findings.reset();
        self.registry = None;
    }
}
