use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle stage at which a group of discovery units is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Early,
    Main,
    Late,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Early, Phase::Main, Phase::Late];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Early => "early",
            Phase::Main => "main",
            Phase::Late => "late",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "early" => Ok(Phase::Early),
            "main" => Ok(Phase::Main),
            "late" => Ok(Phase::Late),
            other => Err(ApiError::InvalidPhase(other.to_string())),
        }
    }
}
