//! Simulator configuration.
//!
//! The machine geometry is fixed (see [`crate::common::constants`]); the
//! configurable surface is the replacement policy and tracing. A config can be
//! loaded from JSON, with every field optional:
//!
//! ```json
//! { "general": { "trace": true }, "memory": { "policy": "LRU" } }
//! ```

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration and startup errors. Raised before any translation happens.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown replacement policy '{0}' (expected RR or LRU)")]
    UnknownPolicy(String),

    #[error("unknown access distribution '{0}' (expected uniform or zipfian)")]
    UnknownDistribution(String),

    #[error("zipfian distribution requires a skew greater than 0, got {0}")]
    InvalidSkew(f64),

    #[error("unknown log format '{0}' (expected text or json)")]
    UnknownLogFormat(String),

    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Replacement policy applied to both the TLB and frame eviction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Policy {
    /// Round-robin victim pointer.
    #[default]
    #[serde(rename = "RR", alias = "rr")]
    Rr,
    /// Least recently used by simulation time.
    #[serde(rename = "LRU", alias = "lru")]
    Lru,
}

impl FromStr for Policy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "RR" => Ok(Policy::Rr),
            "LRU" => Ok(Policy::Lru),
            _ => Err(ConfigError::UnknownPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Rr => write!(f, "RR"),
            Policy::Lru => write!(f, "LRU"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Emit every translation event through `log::trace!`.
    pub trace: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub policy: Policy,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub memory: MemoryConfig,
}

impl Config {
    /// Default configuration with the given policy.
    pub fn with_policy(policy: Policy) -> Self {
        Self {
            memory: MemoryConfig { policy },
            ..Default::default()
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Whether trace output is on, either by config or by the `always-trace`
    /// feature.
    pub fn trace_enabled(&self) -> bool {
        self.general.trace || cfg!(feature = "always-trace")
    }
}
