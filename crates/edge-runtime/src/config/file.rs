//! TOML configuration files.

use serde::Deserialize;
use shared_types::{ConfigError, ReplicaSpec};
use std::path::Path;

/// Every option either binary understands. Keys not listed here (the node
/// settings that share the file) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigFile {
    pub idx: Option<i64>,
    #[serde(default)]
    pub replica: Vec<String>,

    // relay
    pub cport: Option<u16>,
    pub clinworker: Option<i64>,
    pub cliburst: Option<i64>,

    // benchmark
    pub iter: Option<i64>,
    pub max_async: Option<i64>,
    pub cid: Option<i64>,

    // both
    pub max_cli_msg: Option<i64>,
}

impl ConfigFile {
    /// Read and parse `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::parse(&text).map_err(|e| match e {
            ConfigError::Malformed { reason, .. } => ConfigError::Malformed {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Parse file contents.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Malformed {
            path: "<inline>".to_string(),
            reason: e.to_string(),
        })
    }

    /// The `replica` entries, parsed.
    pub fn replicas(&self) -> Result<Vec<ReplicaSpec>, ConfigError> {
        ReplicaSpec::parse_list(&self.replica)
    }
}
