//! Namespace prefix → source directory map.
//!
//! Loaded from the `autoload.psr-4` / `autoload-dev.psr-4` sections of the
//! project manifest. Directories are canonicalized when they exist so that
//! lookups compare against canonical scan paths.

use crate::error::{Result, TrellisError};
use indexmap::IndexMap;
use serde_json::Value;
use std::fs;
use std::path::{Component, Path, PathBuf};
use trellis_api::ClassName;

const AUTOLOAD_SECTIONS: [&str; 2] = ["autoload", "autoload-dev"];

#[derive(Debug, Clone, Default)]
pub struct ModuleMap {
    entries: IndexMap<String, Vec<PathBuf>>,
}

impl ModuleMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, prefix: &str, dir: impl AsRef<Path>) {
        let dir = dir.as_ref();
        let dir = fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
        self.entries
            .entry(normalize_prefix(prefix))
            .or_default()
            .push(dir);
    }

    pub fn with(mut self, prefix: &str, dir: impl AsRef<Path>) -> Self {
        self.insert(prefix, dir);
        self
    }

    /// Read the module map from a JSON manifest. A missing manifest yields an empty map.
    pub fn from_manifest(path: &Path) -> Result<Self> {
        let mut map = Self::new();
        if !path.is_file() {
            tracing::debug!("No module manifest at {}", path.display());
            return Ok(map);
        }

        let raw = fs::read_to_string(path)?;
        let manifest: Value = serde_json::from_str(&raw)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));

        for section in AUTOLOAD_SECTIONS {
            let Some(psr4) = manifest.get(section).and_then(|s| s.get("psr-4")) else {
                continue;
            };
            let Some(psr4) = psr4.as_object() else {
                return Err(TrellisError::Config(format!(
                    "{}: {}.psr-4 must be an object",
                    path.display(),
                    section
                )));
            };
            for (prefix, dirs) in psr4 {
                match dirs {
                    Value::String(dir) => map.insert(prefix, base.join(dir)),
                    Value::Array(dirs) => {
                        for dir in dirs.iter().filter_map(Value::as_str) {
                            map.insert(prefix, base.join(dir));
                        }
                    }
                    _ => {
                        return Err(TrellisError::Config(format!(
                            "{}: directories for prefix '{}' must be a string or an array",
                            path.display(),
                            prefix
                        )));
                    }
                }
            }
        }

        Ok(map)
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Namespace prefix owning `dir`: the deepest mapped directory that is
    /// `dir` or one of its ancestors, extended with the remaining segments.
    pub fn owning_prefix(&self, dir: &Path) -> Option<String> {
        let (prefix, mapped) = self.deepest_entry(dir)?;
        let segments = class_segments(dir.strip_prefix(mapped).ok()?)?;
        if segments.is_empty() {
            Some(prefix.to_string())
        } else {
            Some(format!("{}{}{}", prefix, segments.join("\\"), ClassName::SEPARATOR))
        }
    }

    /// Fully-qualified class name a source file maps to, if a mapped directory owns it.
    pub fn class_for_file(&self, file: &Path) -> Option<ClassName> {
        let (prefix, mapped) = self.deepest_entry(file)?;
        let relative = file.strip_prefix(mapped).ok()?.with_extension("");
        let segments = class_segments(&relative)?;
        if segments.is_empty() {
            return None;
        }
        Some(ClassName::join(prefix, &segments.join("\\")))
    }

    fn deepest_entry(&self, path: &Path) -> Option<(&str, &Path)> {
        self.entries
            .iter()
            .flat_map(|(prefix, dirs)| dirs.iter().map(move |d| (prefix.as_str(), d.as_path())))
            .filter(|(_, dir)| path.starts_with(dir))
            .max_by_key(|(_, dir)| dir.components().count())
    }
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix
        .trim()
        .trim_start_matches(ClassName::SEPARATOR)
        .trim_end_matches(ClassName::SEPARATOR);
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}{}", trimmed, ClassName::SEPARATOR)
    }
}

/// Path segments as namespace segments; `None` if any is not a valid identifier.
fn class_segments(relative: &Path) -> Option<Vec<String>> {
    relative
        .components()
        .map(|component| match component {
            Component::Normal(part) => {
                let part = part.to_str()?;
                is_identifier(part).then(|| part.to_string())
            }
            _ => None,
        })
        .collect()
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
