use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{HealthGraphError, Result};

/// Default file name for a resolver configuration.
pub const CONFIG_FILENAME: &str = "healthgraph.json";

/// How the resolver treats a relation chain that leads back to an entity
/// already under resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePolicy {
    /// Keep the back edge as a reference to the existing node.
    #[default]
    BackReference,
    /// Fail the document with `CyclicRelationGraph`.
    Reject,
}

/// How the resolver treats two relations from the same source to the same
/// target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateTargetPolicy {
    /// The relation type processed last replaces the earlier one.
    #[default]
    LastWins,
    /// Fail the document with `DuplicateRelation`.
    Reject,
}

/// Configuration for the relation resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Schema version of the configuration.
    pub version: u32,
    pub cycle_policy: CyclePolicy,
    pub duplicate_target_policy: DuplicateTargetPolicy,
    /// Whether the document index inside a reference must match the
    /// document's position in its batch.
    pub check_document_index: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            version: 1,
            cycle_policy: CyclePolicy::default(),
            duplicate_target_policy: DuplicateTargetPolicy::default(),
            check_document_index: false,
        }
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("toml")
}

/// Loads the configuration from `path`.
///
/// Files ending in `.toml` are read as TOML, anything else as JSON. A missing
/// file yields the default configuration.
pub fn load_config(path: &Path) -> Result<ResolverConfig> {
    if !path.exists() {
        return Ok(ResolverConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(|e| HealthGraphError::Config {
        message: format!("failed to read config file '{}': {}", path.display(), e),
    })?;

    let config = if is_toml(path) {
        toml::from_str(&contents).map_err(|e| HealthGraphError::Config {
            message: format!("failed to parse config file '{}': {}", path.display(), e),
        })?
    } else {
        serde_json::from_str(&contents).map_err(|e| HealthGraphError::Config {
            message: format!("failed to parse config file '{}': {}", path.display(), e),
        })?
    };

    Ok(config)
}

/// Saves the configuration to `path` using an atomic write.
///
/// Writes to a temporary file next to the target and renames it into place.
pub fn save_config(path: &Path, config: &ResolverConfig) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| HealthGraphError::Config {
            message: format!(
                "failed to create config directory '{}': {}",
                parent.display(),
                e
            ),
        })?;
    }

    let serialized = if is_toml(path) {
        toml::to_string_pretty(config).map_err(|e| HealthGraphError::Config {
            message: format!("failed to serialize config: {}", e),
        })?
    } else {
        serde_json::to_string_pretty(config).map_err(|e| HealthGraphError::Config {
            message: format!("failed to serialize config: {}", e),
        })?
    };

    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, &serialized).map_err(|e| HealthGraphError::Config {
        message: format!(
            "failed to write temporary config file '{}': {}",
            tmp_path.display(),
            e
        ),
    })?;

    fs::rename(&tmp_path, path).map_err(|e| HealthGraphError::Config {
        message: format!(
            "failed to rename temporary config file '{}' to '{}': {}",
            tmp_path.display(),
            path.display(),
            e
        ),
    })?;

    Ok(())
}
