//! Charm configuration and its validation
//!
//! The host hands the operator a flat settings mapping. Only `image` and
//! `port` are consumed; both are required before a pod spec can be built.

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Settings that must be non-empty before a pod spec is built. Kept sorted.
pub const REQUIRED_SETTINGS: [&str; 2] = ["image", "port"];

/// Charm configuration as delivered by the host on `config-changed`.
///
/// Absent and `null` values deserialize to their empty defaults so that an
/// incomplete configuration surfaces as a `Blocked` status rather than a
/// hook failure.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct CharmConfig {
    /// Container image reference, e.g. "nextcloud:25-apache"
    #[serde(default, deserialize_with = "null_as_default")]
    #[schemars(with = "Option<String>")]
    pub image: String,

    /// Port the Nextcloud container listens on
    #[serde(default, deserialize_with = "null_as_default")]
    #[schemars(with = "Option<u16>")]
    pub port: u16,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl CharmConfig {
    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw).map_err(|e| Error::ConfigError(e.to_string()))
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        debug!("Loading charm config from {}", path.display());
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&raw)
    }

    fn is_set(&self, setting: &str) -> bool {
        match setting {
            "image" => !self.image.is_empty(),
            "port" => self.port != 0,
            _ => false,
        }
    }
}

/// Required settings whose configured value is empty, in sorted order.
pub fn missing_settings(config: &CharmConfig) -> Vec<&'static str> {
    let mut missing: Vec<&'static str> = REQUIRED_SETTINGS
        .iter()
        .copied()
        .filter(|setting| !config.is_set(setting))
        .collect();
    missing.sort_unstable();
    missing
}

/// Describe configuration problems for the unit status, or return an empty
/// string when there are none.
pub fn check_problems(config: &CharmConfig) -> String {
    let missing = missing_settings(config);
    if missing.is_empty() {
        return String::new();
    }
    format!("required setting(s) empty: {}", missing.join(", "))
}
