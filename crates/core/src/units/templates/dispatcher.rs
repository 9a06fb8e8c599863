use super::hierarchy;
use super::registry::{HandlerEntry, TemplateRegistry};
use std::sync::Arc;
use tracing::{debug, warn};
use trellis_api::{
    RequestState, TemplateContext, TemplateController, TemplateInterceptor, TemplateOutcome,
};
use trellis_plugin::Container;

/// Interceptor installed on the host's template selection.
///
/// Resolves the request to a template type, materializes the handler from the
/// container and lets it render. Anything short of a rendered body defers to
/// the template the host already chose.
pub struct TemplateDispatcher {
    registry: Arc<TemplateRegistry>,
    container: Arc<Container>,
}

impl TemplateDispatcher {
    pub fn new(registry: Arc<TemplateRegistry>, container: Arc<Container>) -> Self {
        Self {
            registry,
            container,
        }
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn resolve(&self, request: &dyn RequestState) -> Option<(String, HandlerEntry)> {
        hierarchy::resolve(&self.registry, request).map(|(name, entry)| (name, entry.clone()))
    }
}

impl TemplateInterceptor for TemplateDispatcher {
    fn intercept(&self, template: &str, request: &dyn RequestState) -> TemplateOutcome {
        let deferred = || TemplateOutcome::Deferred {
            template: template.to_string(),
        };

        let Some((template_type, entry)) = hierarchy::resolve(&self.registry, request) else {
            return deferred();
        };
        let Some(controller) = self.container.get::<dyn TemplateController>(&entry.handler) else {
            warn!(
                "Template handler {} for '{}' is not bound in the container",
                entry.handler, template_type
            );
            return deferred();
        };

        let context = TemplateContext::from_render_context(template_type.as_str(), request.render_context());
        match controller.render(&context) {
            Some(body) => {
                debug!("Template '{}' rendered by {}", template_type, entry.handler);
                TemplateOutcome::Handled {
                    template_type,
                    handler: entry.handler.clone(),
                    body,
                }
            }
            None => {
                debug!("{} declined template '{}'", entry.handler, template_type);
                deferred()
            }
        }
    }
}
