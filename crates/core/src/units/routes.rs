//! REST route markers on public methods → `register_route`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use trellis_api::{
    ClassDefinition, ClassName, HostRegistry, Location, MarkerType, MethodCallback,
    PermissionCallback, RouteMarker, RouteRegistration,
};
use trellis_plugin::{DiscoveryError, DiscoveryUnit, FindingStore, UnitFindings};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteFinding {
    pub class_name: ClassName,
    pub method_name: String,
    pub namespace: String,
    pub path: String,
    pub methods: Vec<String>,
    pub permission: Option<String>,
    #[serde(default)]
    pub args: Value,
}

impl RouteFinding {
    fn registration(&self) -> RouteRegistration {
        let permission = match &self.permission {
            Some(method) => {
                PermissionCallback::Method(MethodCallback::new(self.class_name.clone(), method.clone()))
            }
            None => PermissionCallback::Public,
        };
        RouteRegistration {
            namespace: self.namespace.clone(),
            path: self.path.clone(),
            methods: self.methods.clone(),
            callback: MethodCallback::new(self.class_name.clone(), self.method_name.clone()),
            permission,
            args: self.args.clone(),
        }
    }
}

fn normalize_namespace(namespace: &str) -> String {
    namespace.trim_matches('/').to_string()
}

fn normalize_path(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

#[derive(Default)]
pub struct RouteDiscovery {
    findings: UnitFindings<RouteFinding>,
}

impl RouteDiscovery {
    pub const ID: &'static str = "routes";

    pub fn new() -> Self {
        Self::default()
    }
}

impl DiscoveryUnit for RouteDiscovery {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn discover(&mut self, location: &Location, class: &ClassDefinition) -> Result<(), DiscoveryError> {
        let routes: Vec<_> = class
            .public_methods()
            .filter_map(|method| method.typed::<RouteMarker>().map(|marker| (method, marker)))
            .collect();

        // Every permission method must resolve before anything is recorded.
        for (_, marker) in &routes {
            if let Some(permission) = &marker.permission {
                let callable = class.method(permission).is_some_and(|m| m.public);
                if !callable {
                    return Err(DiscoveryError::Configuration {
                        class: class.name.clone(),
                        marker: RouteMarker::KIND,
                        requirement: format!(
                            "names permission method {} which is missing or not public",
                            permission
                        ),
                    });
                }
            }
        }

        for (method, marker) in routes {
            self.findings.push(
                location,
                RouteFinding {
                    class_name: class.name.clone(),
                    method_name: method.name.clone(),
                    namespace: normalize_namespace(&marker.namespace),
                    path: normalize_path(&marker.path),
                    methods: marker.methods.iter().map(|m| m.to_ascii_uppercase()).collect(),
                    permission: marker.permission.clone(),
                    args: marker.args.clone(),
                },
            );
        }
        Ok(())
    }

    fn apply(&mut self, host: &mut dyn HostRegistry) {
        for finding in self.findings.findings() {
            host.register_route(finding.registration());
        }
    }

    fn store(&self) -> &dyn FindingStore {
        &self.findings
    }

    fn store_mut(&mut self) -> &mut dyn FindingStore {
        &mut self.findings
    }
}
