//! Built-in discovery units.

pub mod content_types;
pub mod extensions;
pub mod hooks;
pub mod routes;
pub mod templates;

pub use content_types::{CONTENT_MODEL, ContentTypeDiscovery, ContentTypeFinding};
pub use extensions::{ExtensionDiscovery, ExtensionFinding, RENDERING_EXTENSION};
pub use hooks::{HookDiscovery, HookFinding, HookKind};
pub use routes::{RouteDiscovery, RouteFinding};
pub use templates::{
    INTERCEPT_PRIORITY, TEMPLATE_CONTROLLER, TemplateControllerDiscovery, TemplateDispatcher,
    TemplateFinding, TemplateRegistry,
};
