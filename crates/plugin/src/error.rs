use thiserror::Error;
use trellis_api::{ClassName, MarkerKind};

#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// A marked class violates a structural requirement of its marker.
    #[error("{class} is marked {marker} but {requirement}")]
    Configuration {
        class: ClassName,
        marker: MarkerKind,
        requirement: String,
    },
    #[error("cached findings for unit '{unit}' could not be restored: {source}")]
    Restore {
        unit: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("findings of unit '{unit}' could not be projected for caching: {source}")]
    Projection {
        unit: String,
        #[source]
        source: serde_json::Error,
    },
}

impl DiscoveryError {
    pub fn missing_capability(class: &ClassName, marker: MarkerKind, capability: &str) -> Self {
        DiscoveryError::Configuration {
            class: class.clone(),
            marker,
            requirement: format!("does not implement {}", capability),
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, DiscoveryError::Configuration { .. })
    }
}
