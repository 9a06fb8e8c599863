//! In-memory [`HostRegistry`] that records every registration.
//!
//! Used by the CLI warm command, where registrations have no live host to go
//! to, and by tests that assert on what a phase registered.

use std::sync::Arc;
use trellis_api::{
    ClassName, ContentTypeRegistration, ExtensionRegistration, HostRegistry, MethodCallback,
    RequestState, RouteRegistration, TemplateInterceptor, TemplateOutcome,
};

#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    AddAction {
        hook: String,
        callback: MethodCallback,
        priority: i32,
        accepted_args: u32,
    },
    AddFilter {
        hook: String,
        callback: MethodCallback,
        priority: i32,
        accepted_args: u32,
    },
    RegisterContentType(ContentTypeRegistration),
    RegisterClassMap {
        content_type: String,
        class: ClassName,
    },
    RegisterRoute(RouteRegistration),
    RegisterExtension(ExtensionRegistration),
    InterceptTemplate {
        priority: i32,
    },
}

#[derive(Default)]
pub struct RecordingHost {
    calls: Vec<HostCall>,
    interceptors: Vec<(i32, Arc<dyn TemplateInterceptor>)>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Hooks registered under `hook`, actions and filters alike.
    pub fn callbacks_for(&self, hook: &str) -> Vec<&MethodCallback> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::AddAction { hook: h, callback, .. }
                | HostCall::AddFilter { hook: h, callback, .. }
                    if h == hook =>
                {
                    Some(callback)
                }
                _ => None,
            })
            .collect()
    }

    /// Run the template selection chain the way the host would: interceptors
    /// in priority order, each seeing the previous one's template.
    ///
    /// Returns `None` when nothing was installed.
    pub fn intercept(&self, template: &str, request: &dyn RequestState) -> Option<TemplateOutcome> {
        if self.interceptors.is_empty() {
            return None;
        }
        let mut ordered: Vec<_> = self.interceptors.iter().collect();
        ordered.sort_by_key(|(priority, _)| *priority);

        let mut outcome = TemplateOutcome::Deferred {
            template: template.to_string(),
        };
        for (_, interceptor) in ordered {
            outcome = interceptor.intercept(outcome.template(), request);
            if outcome.is_handled() {
                break;
            }
        }
        Some(outcome)
    }
}

impl HostRegistry for RecordingHost {
    fn add_action(&mut self, hook: &str, callback: MethodCallback, priority: i32, accepted_args: u32) {
        self.calls.push(HostCall::AddAction {
            hook: hook.to_string(),
            callback,
            priority,
            accepted_args,
        });
    }

    fn add_filter(&mut self, hook: &str, callback: MethodCallback, priority: i32, accepted_args: u32) {
        self.calls.push(HostCall::AddFilter {
            hook: hook.to_string(),
            callback,
            priority,
            accepted_args,
        });
    }

    fn register_content_type(&mut self, registration: ContentTypeRegistration) {
        self.calls.push(HostCall::RegisterContentType(registration));
    }

    fn register_class_map(&mut self, content_type: &str, class: ClassName) {
        self.calls.push(HostCall::RegisterClassMap {
            content_type: content_type.to_string(),
            class,
        });
    }

    fn register_route(&mut self, route: RouteRegistration) {
        self.calls.push(HostCall::RegisterRoute(route));
    }

    fn register_extension(&mut self, extension: ExtensionRegistration) {
        self.calls.push(HostCall::RegisterExtension(extension));
    }

    fn intercept_template(&mut self, interceptor: Arc<dyn TemplateInterceptor>, priority: i32) {
        self.calls.push(HostCall::InterceptTemplate { priority });
        self.interceptors.push((priority, interceptor));
    }
}
