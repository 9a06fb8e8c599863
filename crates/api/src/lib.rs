pub mod cache;
pub mod error;
pub mod host;
pub mod models;
pub mod template;

// Re-export commonly used types
pub use cache::{CacheStatus, UnitSummary};
pub use error::ApiError;
pub use host::{
    ContentTypeRegistration, ExtensionRegistration, HostRegistry, MethodCallback,
    PermissionCallback, RouteRegistration,
};
pub use models::*;
pub use template::{
    Conditional, QueriedObject, RequestState, StaticRequest, TemplateContext, TemplateController,
    TemplateInterceptor, TemplateOutcome,
};
