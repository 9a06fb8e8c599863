//! Narrow registration surface of the host runtime.
//!
//! Discovery units never touch host globals directly; they describe each
//! registration as plain values and hand them to a [`HostRegistry`].

use crate::models::ClassName;
use crate::template::TemplateInterceptor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Method name used for class-level hooks.
pub const INVOKE_METHOD: &str = "__invoke";

/// A `(class, method)` pair the host resolves through the container when the
/// hook or route fires.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodCallback {
    pub class: ClassName,
    pub method: String,
}

impl MethodCallback {
    pub fn new(class: impl Into<ClassName>, method: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            method: method.into(),
        }
    }
}

impl fmt::Display for MethodCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.class, self.method)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentTypeRegistration {
    pub name: String,
    pub args: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionCallback {
    Public,
    Method(MethodCallback),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRegistration {
    pub namespace: String,
    pub path: String,
    pub methods: Vec<String>,
    pub callback: MethodCallback,
    pub permission: PermissionCallback,
    pub args: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionRegistration {
    pub class: ClassName,
    pub priority: i32,
}

/// Registration calls the core makes against the host runtime.
pub trait HostRegistry {
    fn add_action(&mut self, hook: &str, callback: MethodCallback, priority: i32, accepted_args: u32);

    fn add_filter(&mut self, hook: &str, callback: MethodCallback, priority: i32, accepted_args: u32);

    fn register_content_type(&mut self, registration: ContentTypeRegistration);

    /// Map a content type to the model class the rendering layer should wrap it in.
    fn register_class_map(&mut self, content_type: &str, class: ClassName);

    fn register_route(&mut self, route: RouteRegistration);

    fn register_extension(&mut self, extension: ExtensionRegistration);

    fn intercept_template(&mut self, interceptor: Arc<dyn TemplateInterceptor>, priority: i32);
}
