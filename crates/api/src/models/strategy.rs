use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How much of the discovery result is persisted between processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheStrategy {
    /// Always scan.
    #[default]
    None,
    /// Cache units with [`CacheScope::Core`] only; the rest are scanned.
    Partial,
    /// Cache every unit.
    Full,
}

impl CacheStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStrategy::None => "none",
            CacheStrategy::Partial => "partial",
            CacheStrategy::Full => "full",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, CacheStrategy::None)
    }

    pub fn covers(&self, scope: CacheScope) -> bool {
        match self {
            CacheStrategy::None => false,
            CacheStrategy::Partial => scope == CacheScope::Core,
            CacheStrategy::Full => true,
        }
    }
}

impl fmt::Display for CacheStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheStrategy {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(CacheStrategy::None),
            "partial" => Ok(CacheStrategy::Partial),
            "full" => Ok(CacheStrategy::Full),
            other => Err(ApiError::InvalidStrategy(other.to_string())),
        }
    }
}

/// Which strategies persist a unit's findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheScope {
    /// Boot-critical registrations, cached by `partial` and `full`.
    Core,
    /// Cached by `full` only.
    Extended,
}
