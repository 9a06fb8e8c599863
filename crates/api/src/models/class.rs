use super::marker::{Marker, MarkerKind, MarkerType};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::path::PathBuf;

/// Fully-qualified class identifier, e.g. `App\Hooks\ThemeSetup`.
///
/// Names are normalized on construction: surrounding whitespace and the
/// leading namespace separator are dropped, so `\App\Foo` and `App\Foo`
/// compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ClassName(String);

impl ClassName {
    pub const SEPARATOR: char = '\\';

    pub fn new(name: impl AsRef<str>) -> Self {
        let name = name.as_ref().trim().trim_start_matches(Self::SEPARATOR);
        Self(name.to_string())
    }

    /// Join a namespace prefix (with or without trailing separator) and a relative name.
    pub fn join(prefix: &str, relative: &str) -> Self {
        let prefix = prefix.trim_end_matches(Self::SEPARATOR);
        if prefix.is_empty() {
            Self::new(relative)
        } else {
            Self::new(format!("{}{}{}", prefix, Self::SEPARATOR, relative))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Namespace portion without trailing separator; empty for global classes.
    pub fn namespace(&self) -> &str {
        self.0
            .rsplit_once(Self::SEPARATOR)
            .map(|(ns, _)| ns)
            .unwrap_or("")
    }

    pub fn short_name(&self) -> &str {
        self.0
            .rsplit_once(Self::SEPARATOR)
            .map(|(_, name)| name)
            .unwrap_or(&self.0)
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ClassName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ClassName {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<ClassName> for String {
    fn from(name: ClassName) -> Self {
        name.0
    }
}

impl AsRef<str> for ClassName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for ClassName {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

/// Structural kind of a declared type. Only `Concrete` types can be instantiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    #[default]
    Concrete,
    Abstract,
    Interface,
    Trait,
    Enum,
}

impl ClassKind {
    pub fn is_concrete(&self) -> bool {
        matches!(self, ClassKind::Concrete)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassKind::Concrete => "class",
            ClassKind::Abstract => "abstract class",
            ClassKind::Interface => "interface",
            ClassKind::Trait => "trait",
            ClassKind::Enum => "enum",
        }
    }
}

/// A public or private method together with the markers attached to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDefinition {
    pub name: String,
    #[serde(default = "default_public")]
    pub public: bool,
    #[serde(default)]
    pub markers: Vec<Marker>,
}

fn default_public() -> bool {
    true
}

impl MethodDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            public: true,
            markers: Vec::new(),
        }
    }

    pub fn private(mut self) -> Self {
        self.public = false;
        self
    }

    pub fn with_marker(mut self, marker: impl Into<Marker>) -> Self {
        self.markers.push(marker.into());
        self
    }

    pub fn marker(&self, kind: MarkerKind) -> Option<&Marker> {
        self.markers.iter().find(|m| m.kind() == kind)
    }

    pub fn typed<M: MarkerType>(&self) -> Option<&M> {
        self.markers.iter().find_map(M::extract)
    }
}

/// Declarative description of one class: its kind, the capabilities it
/// implements, and the markers attached to it and its methods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDefinition {
    pub name: ClassName,
    #[serde(default)]
    pub kind: ClassKind,
    #[serde(default)]
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub markers: Vec<Marker>,
    #[serde(default)]
    pub methods: Vec<MethodDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl ClassDefinition {
    pub fn new(name: impl Into<ClassName>) -> Self {
        Self {
            name: name.into(),
            kind: ClassKind::Concrete,
            capabilities: Vec::new(),
            markers: Vec::new(),
            methods: Vec::new(),
            file: None,
        }
    }

    pub fn with_kind(mut self, kind: ClassKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn implementing(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.push(capability.into());
        self
    }

    pub fn with_marker(mut self, marker: impl Into<Marker>) -> Self {
        self.markers.push(marker.into());
        self
    }

    pub fn with_method(mut self, method: MethodDefinition) -> Self {
        self.methods.push(method);
        self
    }

    pub fn is_concrete(&self) -> bool {
        self.kind.is_concrete()
    }

    /// Capability names compare on the short name, so `Timber\Post` satisfies `Post`.
    pub fn implements(&self, capability: &str) -> bool {
        let wanted = ClassName::new(capability);
        self.capabilities.iter().any(|c| {
            let have = ClassName::new(c);
            have == wanted || have.short_name() == wanted.short_name()
        })
    }

    pub fn marker(&self, kind: MarkerKind) -> Option<&Marker> {
        self.markers.iter().find(|m| m.kind() == kind)
    }

    pub fn typed<M: MarkerType>(&self) -> Option<&M> {
        self.markers.iter().find_map(M::extract)
    }

    pub fn method(&self, name: &str) -> Option<&MethodDefinition> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn public_methods(&self) -> impl Iterator<Item = &MethodDefinition> {
        self.methods.iter().filter(|m| m.public)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_name_normalization() {
        let name = ClassName::new("\\App\\Hooks\\ThemeSetup");
        assert_eq!(name.as_str(), "App\\Hooks\\ThemeSetup");
        assert_eq!(name.namespace(), "App\\Hooks");
        assert_eq!(name.short_name(), "ThemeSetup");

        let global = ClassName::new("Bootstrap");
        assert_eq!(global.namespace(), "");
        assert_eq!(global.short_name(), "Bootstrap");
    }

    #[test]
    fn test_class_name_join() {
        assert_eq!(
            ClassName::join("App\\", "Models\\Event").as_str(),
            "App\\Models\\Event"
        );
        assert_eq!(ClassName::join("", "Event").as_str(), "Event");
    }

    #[test]
    fn test_implements_matches_short_name() {
        let def = ClassDefinition::new("App\\Models\\Event").implementing("Timber\\Post");
        assert!(def.implements("Post"));
        assert!(def.implements("\\Timber\\Post"));
        assert!(!def.implements("Term"));
    }
}
