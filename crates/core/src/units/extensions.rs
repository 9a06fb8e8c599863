//! Rendering extension markers → `register_extension`.

use serde::{Deserialize, Serialize};
use trellis_api::{
    CacheScope, ClassDefinition, ClassName, ExtensionRegistration, HostRegistry, Location,
    MarkerType, RenderingExtensionMarker,
};
use trellis_plugin::{DiscoveryError, DiscoveryUnit, FindingStore, UnitFindings};

pub const RENDERING_EXTENSION: &str = "RenderingExtension";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionFinding {
    pub class_name: ClassName,
    pub priority: i32,
}

#[derive(Default)]
pub struct ExtensionDiscovery {
    findings: UnitFindings<ExtensionFinding>,
}

impl ExtensionDiscovery {
    pub const ID: &'static str = "extensions";

    pub fn new() -> Self {
        Self::default()
    }
}

impl DiscoveryUnit for ExtensionDiscovery {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn cache_scope(&self) -> CacheScope {
        CacheScope::Core
    }

    fn discover(&mut self, location: &Location, class: &ClassDefinition) -> Result<(), DiscoveryError> {
        let Some(marker) = class.typed::<RenderingExtensionMarker>() else {
            return Ok(());
        };
        if !class.implements(RENDERING_EXTENSION) {
            return Err(DiscoveryError::missing_capability(
                &class.name,
                RenderingExtensionMarker::KIND,
                RENDERING_EXTENSION,
            ));
        }
        self.findings.push(
            location,
            ExtensionFinding {
                class_name: class.name.clone(),
                priority: marker.priority,
            },
        );
        Ok(())
    }

    fn apply(&mut self, host: &mut dyn HostRegistry) {
        for finding in self.findings.findings() {
            host.register_extension(ExtensionRegistration {
                class: finding.class_name.clone(),
                priority: finding.priority,
            });
        }
    }

    fn store(&self) -> &dyn FindingStore {
        &self.findings
    }

    fn store_mut(&mut self) -> &mut dyn FindingStore {
        &mut self.findings
    }
}
