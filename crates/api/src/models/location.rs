use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Where a set of classes lives: the namespace prefix owned by a root
/// directory, and whether that directory is first-party code or a package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub namespace_prefix: String,
    pub root_path: PathBuf,
    pub is_external_package: bool,
}

impl Location {
    pub fn new(
        namespace_prefix: impl Into<String>,
        root_path: impl Into<PathBuf>,
        is_external_package: bool,
    ) -> Self {
        Self {
            namespace_prefix: namespace_prefix.into(),
            root_path: root_path.into(),
            is_external_package,
        }
    }

    pub fn application(namespace_prefix: impl Into<String>, root_path: impl Into<PathBuf>) -> Self {
        Self::new(namespace_prefix, root_path, false)
    }

    pub fn external(namespace_prefix: impl Into<String>, root_path: impl Into<PathBuf>) -> Self {
        Self::new(namespace_prefix, root_path, true)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let origin = if self.is_external_package { "package" } else { "app" };
        write!(
            f,
            "{} ({}, {})",
            self.namespace_prefix,
            self.root_path.display(),
            origin
        )
    }
}
