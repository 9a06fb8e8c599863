//! Declarative markers attached to classes and methods.
//!
//! A marker is a typed metadata record. Classes carry zero-or-one marker of a
//! given kind; lookups go through [`MarkerKind`] or the typed [`MarkerType`]
//! accessor.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub const DEFAULT_PRIORITY: i32 = 10;

fn default_priority() -> i32 {
    DEFAULT_PRIORITY
}

fn default_accepted_args() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    Action,
    Filter,
    ContentType,
    RenderingExtension,
    Route,
    TemplateController,
}

impl MarkerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerKind::Action => "action",
            MarkerKind::Filter => "filter",
            MarkerKind::ContentType => "content_type",
            MarkerKind::RenderingExtension => "rendering_extension",
            MarkerKind::Route => "route",
            MarkerKind::TemplateController => "template_controller",
        }
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Marker {
    Action(HookMarker),
    Filter(HookMarker),
    ContentType(ContentTypeMarker),
    RenderingExtension(RenderingExtensionMarker),
    Route(RouteMarker),
    TemplateController(TemplateControllerMarker),
}

impl Marker {
    pub fn kind(&self) -> MarkerKind {
        match self {
            Marker::Action(_) => MarkerKind::Action,
            Marker::Filter(_) => MarkerKind::Filter,
            Marker::ContentType(_) => MarkerKind::ContentType,
            Marker::RenderingExtension(_) => MarkerKind::RenderingExtension,
            Marker::Route(_) => MarkerKind::Route,
            Marker::TemplateController(_) => MarkerKind::TemplateController,
        }
    }

    pub fn action(hook: impl Into<String>) -> Self {
        Marker::Action(HookMarker::new(hook))
    }

    pub fn filter(hook: impl Into<String>) -> Self {
        Marker::Filter(HookMarker::new(hook))
    }

    /// Hook payload for `Action` and `Filter` markers.
    pub fn as_hook(&self) -> Option<&HookMarker> {
        match self {
            Marker::Action(m) | Marker::Filter(m) => Some(m),
            _ => None,
        }
    }
}

/// Typed access to a marker variant with a unique payload type.
pub trait MarkerType: Sized {
    const KIND: MarkerKind;

    fn extract(marker: &Marker) -> Option<&Self>;
}

macro_rules! marker_type {
    ($ty:ty, $variant:ident) => {
        impl MarkerType for $ty {
            const KIND: MarkerKind = MarkerKind::$variant;

            fn extract(marker: &Marker) -> Option<&Self> {
                match marker {
                    Marker::$variant(m) => Some(m),
                    _ => None,
                }
            }
        }

        impl From<$ty> for Marker {
            fn from(m: $ty) -> Self {
                Marker::$variant(m)
            }
        }
    };
}

marker_type!(ContentTypeMarker, ContentType);
marker_type!(RenderingExtensionMarker, RenderingExtension);
marker_type!(RouteMarker, Route);
marker_type!(TemplateControllerMarker, TemplateController);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookMarker {
    pub hook: String,
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(default = "default_accepted_args")]
    pub accepted_args: u32,
}

impl HookMarker {
    pub fn new(hook: impl Into<String>) -> Self {
        Self {
            hook: hook.into(),
            priority: DEFAULT_PRIORITY,
            accepted_args: 1,
        }
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn accepted_args(mut self, accepted_args: u32) -> Self {
        self.accepted_args = accepted_args;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentTypeMarker {
    pub name: String,
    #[serde(default)]
    pub singular: Option<String>,
    #[serde(default)]
    pub plural: Option<String>,
    #[serde(default = "default_true")]
    pub public: bool,
    #[serde(default)]
    pub has_archive: bool,
    #[serde(default = "default_supports")]
    pub supports: Vec<String>,
    #[serde(default)]
    pub menu_icon: Option<String>,
    #[serde(default)]
    pub rewrite_slug: Option<String>,
    #[serde(default)]
    pub taxonomies: Vec<String>,
}

fn default_supports() -> Vec<String> {
    vec!["title".to_string(), "editor".to_string()]
}

impl ContentTypeMarker {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            singular: None,
            plural: None,
            public: true,
            has_archive: false,
            supports: default_supports(),
            menu_icon: None,
            rewrite_slug: None,
            taxonomies: Vec::new(),
        }
    }

    pub fn labels(mut self, singular: impl Into<String>, plural: impl Into<String>) -> Self {
        self.singular = Some(singular.into());
        self.plural = Some(plural.into());
        self
    }

    pub fn with_archive(mut self) -> Self {
        self.has_archive = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderingExtensionMarker {
    #[serde(default = "default_priority")]
    pub priority: i32,
}

impl Default for RenderingExtensionMarker {
    fn default() -> Self {
        Self {
            priority: DEFAULT_PRIORITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteMarker {
    pub namespace: String,
    pub path: String,
    #[serde(default = "default_methods")]
    pub methods: Vec<String>,
    /// Name of a public method on the same class that authorizes the request.
    /// Routes without one are public.
    #[serde(default)]
    pub permission: Option<String>,
    #[serde(default)]
    pub args: serde_json::Value,
}

fn default_methods() -> Vec<String> {
    vec!["GET".to_string()]
}

impl RouteMarker {
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            path: path.into(),
            methods: default_methods(),
            permission: None,
            args: serde_json::Value::Null,
        }
    }

    pub fn methods(mut self, methods: &[&str]) -> Self {
        self.methods = methods.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn permission(mut self, method: impl Into<String>) -> Self {
        self.permission = Some(method.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateControllerMarker {
    #[serde(deserialize_with = "one_or_many")]
    pub templates: Vec<String>,
    #[serde(default = "default_priority")]
    pub priority: i32,
}

impl TemplateControllerMarker {
    pub fn new<I, S>(templates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            templates: templates.into_iter().map(Into::into).collect(),
            priority: DEFAULT_PRIORITY,
        }
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    })
}
