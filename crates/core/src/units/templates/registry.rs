//! Template name → handler lookup table.
//!
//! Names without `*` go to the exact map. Names with `*` are wildcard
//! patterns where `*` matches any run of characters and everything else is
//! literal, anchored at both ends.

use indexmap::IndexMap;
use regex::Regex;
use tracing::warn;
use trellis_api::ClassName;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerEntry {
    pub handler: ClassName,
    pub priority: i32,
}

#[derive(Debug)]
struct WildcardEntry {
    pattern: String,
    regex: Regex,
    entry: HandlerEntry,
}

#[derive(Debug, Default)]
pub struct TemplateRegistry {
    exact: IndexMap<String, HandlerEntry>,
    wildcards: Vec<WildcardEntry>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a name or pattern.
    ///
    /// When the same name or pattern is registered twice the higher priority
    /// wins and ties keep the first registration.
    pub fn register(&mut self, pattern: &str, handler: &ClassName, priority: i32) {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return;
        }
        let entry = HandlerEntry {
            handler: handler.clone(),
            priority,
        };

        if !pattern.contains('*') {
            match self.exact.get_mut(pattern) {
                Some(existing) if existing.priority >= priority => {}
                Some(existing) => *existing = entry,
                None => {
                    self.exact.insert(pattern.to_string(), entry);
                }
            }
            return;
        }

        if let Some(existing) = self.wildcards.iter_mut().find(|w| w.pattern == pattern) {
            if priority > existing.entry.priority {
                existing.entry = entry;
            }
            return;
        }
        match wildcard_regex(pattern) {
            Ok(regex) => self.wildcards.push(WildcardEntry {
                pattern: pattern.to_string(),
                regex,
                entry,
            }),
            Err(e) => warn!("Ignoring template pattern '{}' of {}: {}", pattern, handler, e),
        }
    }

    /// Exact match first, then the first wildcard in registration order.
    ///
    /// Priority is not consulted across different wildcard patterns.
    pub fn lookup(&self, template_type: &str) -> Option<&HandlerEntry> {
        if let Some(entry) = self.exact.get(template_type) {
            return Some(entry);
        }
        self.wildcards
            .iter()
            .find(|w| w.regex.is_match(template_type))
            .map(|w| &w.entry)
    }

    pub fn len(&self) -> usize {
        self.exact.len() + self.wildcards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn wildcard_regex(pattern: &str) -> Result<Regex, regex::Error> {
    let body = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    Regex::new(&format!("^{}$", body))
}
