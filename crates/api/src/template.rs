//! Request-time template selection interfaces.

use crate::models::ClassName;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Boolean request conditions the host answers for the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Conditional {
    NotFound,
    Search,
    FrontPage,
    Home,
    Singular,
    Attachment,
    Page,
    Archive,
    PostTypeArchive,
    Category,
    Tag,
    Taxonomy,
    Author,
    Date,
}

/// The object the current request is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueriedObject {
    Post {
        id: u64,
        post_type: String,
        slug: String,
    },
    Term {
        id: u64,
        taxonomy: String,
        slug: String,
    },
    Author {
        id: u64,
        nicename: String,
    },
    PostType {
        name: String,
    },
}

impl QueriedObject {
    pub fn post(id: u64, post_type: impl Into<String>, slug: impl Into<String>) -> Self {
        QueriedObject::Post {
            id,
            post_type: post_type.into(),
            slug: slug.into(),
        }
    }

    pub fn term(id: u64, taxonomy: impl Into<String>, slug: impl Into<String>) -> Self {
        QueriedObject::Term {
            id,
            taxonomy: taxonomy.into(),
            slug: slug.into(),
        }
    }

    pub fn author(id: u64, nicename: impl Into<String>) -> Self {
        QueriedObject::Author {
            id,
            nicename: nicename.into(),
        }
    }

    pub fn post_type(name: impl Into<String>) -> Self {
        QueriedObject::PostType { name: name.into() }
    }
}

/// Read-only view of the current request.
pub trait RequestState {
    fn is(&self, conditional: Conditional) -> bool;

    fn queried_object(&self) -> Option<&QueriedObject>;

    /// Ambient rendering context (`post`, `posts`, `site`, `user`, ...).
    fn render_context(&self) -> Map<String, Value>;
}

/// Plain request snapshot, mostly useful for tests and tooling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticRequest {
    #[serde(default)]
    pub conditionals: Vec<Conditional>,
    #[serde(default)]
    pub queried: Option<QueriedObject>,
    #[serde(default)]
    pub context: Map<String, Value>,
}

impl StaticRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, conditional: Conditional) -> Self {
        if !self.conditionals.contains(&conditional) {
            self.conditionals.push(conditional);
        }
        self
    }

    pub fn queried(mut self, object: QueriedObject) -> Self {
        self.queried = Some(object);
        self
    }

    pub fn context_value(mut self, key: impl Into<String>, value: Value) -> Self {
        self.context.insert(key.into(), value);
        self
    }

    pub fn singular(post_type: &str, id: u64, slug: &str) -> Self {
        let request = Self::new()
            .with(Conditional::Singular)
            .queried(QueriedObject::post(id, post_type, slug));
        match post_type {
            "page" => request.with(Conditional::Page),
            "attachment" => request.with(Conditional::Attachment),
            _ => request,
        }
    }

    pub fn post_type_archive(post_type: &str) -> Self {
        Self::new()
            .with(Conditional::Archive)
            .with(Conditional::PostTypeArchive)
            .queried(QueriedObject::post_type(post_type))
    }
}

impl RequestState for StaticRequest {
    fn is(&self, conditional: Conditional) -> bool {
        self.conditionals.contains(&conditional)
    }

    fn queried_object(&self) -> Option<&QueriedObject> {
        self.queried.as_ref()
    }

    fn render_context(&self) -> Map<String, Value> {
        self.context.clone()
    }
}

/// Context handed to a template controller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateContext {
    pub template_type: String,
    pub post: Option<Value>,
    pub posts: Option<Value>,
    pub site: Option<Value>,
    pub user: Option<Value>,
    /// Every other ambient key.
    pub extra: Map<String, Value>,
}

impl TemplateContext {
    pub fn from_render_context(template_type: impl Into<String>, mut context: Map<String, Value>) -> Self {
        Self {
            template_type: template_type.into(),
            post: context.remove("post"),
            posts: context.remove("posts"),
            site: context.remove("site"),
            user: context.remove("user"),
            extra: context,
        }
    }
}

/// Renders a full response body for a resolved template type.
pub trait TemplateController: Send + Sync {
    /// `None` defers to the host's default template.
    fn render(&self, context: &TemplateContext) -> Option<String>;
}

/// Result of the template interception point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateOutcome {
    /// No handler produced output; the host keeps its template.
    Deferred { template: String },
    /// A controller produced the response body; the host must not include a template.
    Handled {
        template_type: String,
        handler: ClassName,
        body: String,
    },
}

impl TemplateOutcome {
    /// Template path the host should include: the original one, or empty when handled.
    pub fn template(&self) -> &str {
        match self {
            TemplateOutcome::Deferred { template } => template,
            TemplateOutcome::Handled { .. } => "",
        }
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            TemplateOutcome::Deferred { .. } => None,
            TemplateOutcome::Handled { body, .. } => Some(body),
        }
    }

    pub fn is_handled(&self) -> bool {
        matches!(self, TemplateOutcome::Handled { .. })
    }
}

/// Single interception callback registered with the host's template selection.
pub trait TemplateInterceptor: Send + Sync {
    fn intercept(&self, template: &str, request: &dyn RequestState) -> TemplateOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_context_splits_known_keys() {
        let mut map = Map::new();
        map.insert("post".into(), json!({"id": 7}));
        map.insert("site".into(), json!({"name": "Demo"}));
        map.insert("menu".into(), json!(["home"]));

        let ctx = TemplateContext::from_render_context("single", map);
        assert_eq!(ctx.post, Some(json!({"id": 7})));
        assert_eq!(ctx.site, Some(json!({"name": "Demo"})));
        assert!(ctx.user.is_none());
        assert_eq!(ctx.extra.len(), 1);
        assert!(ctx.extra.contains_key("menu"));
    }

    #[test]
    fn test_outcome_template_marker() {
        let deferred = TemplateOutcome::Deferred {
            template: "/theme/index.php".into(),
        };
        assert_eq!(deferred.template(), "/theme/index.php");
        assert!(!deferred.is_handled());

        let handled = TemplateOutcome::Handled {
            template_type: "single".into(),
            handler: ClassName::new("App\\Controllers\\Single"),
            body: "<html/>".into(),
        };
        assert_eq!(handled.template(), "");
        assert_eq!(handled.body(), Some("<html/>"));
    }
}
