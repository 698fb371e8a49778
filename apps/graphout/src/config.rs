//! # Configuration
//!
//! Loads `graphout.toml` and merges command-line overrides into it.
//!
//! ```toml
//! [serializer]
//! format = "dot"
//! base = "http://example.org/"
//!
//! [features]
//! relativeURIs = 1
//! resourceFill = "lightblue"
//! ```
//!
//! Feature values are handed to the serializer as text, so the core decides
//! per feature whether the value is an integer or a string.

use graphout_core::{Feature, GraphoutError, Location, Serializer};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// File consulted when no `--config` path is given.
pub const DEFAULT_CONFIG_FILE: &str = "graphout.toml";

/// Maximum config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

// =============================================================================
// CONFIG STRUCTURE
// =============================================================================

/// The `[serializer]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SerializerSection {
    /// Format name or alias. `None` selects the default format.
    pub format: Option<String>,
    /// Base location for relative output.
    pub base: Option<String>,
}

/// A parsed configuration file plus any overrides applied to it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub serializer: SerializerSection,
    /// Feature short name to value.
    #[serde(default)]
    pub features: BTreeMap<String, toml::Value>,
}

impl Config {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, GraphoutError> {
        toml::from_str(content)
            .map_err(|e| GraphoutError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, GraphoutError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            GraphoutError::Config(format!(
                "Cannot read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(GraphoutError::Config(format!(
                "Config file size {} bytes exceeds maximum allowed {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            GraphoutError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Self::from_toml_str(&content)
    }

    /// Load the explicit file, or `graphout.toml` if it exists, or defaults.
    ///
    /// An explicit path that does not exist is an error; a missing default
    /// file is not.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, GraphoutError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    // =========================================================================
    // OVERRIDES
    // =========================================================================

    /// Apply command-line overrides. Later `name=value` pairs win.
    pub fn apply_overrides(
        &mut self,
        format: Option<String>,
        base: Option<String>,
        features: &[String],
    ) -> Result<(), GraphoutError> {
        if format.is_some() {
            self.serializer.format = format;
        }
        if base.is_some() {
            self.serializer.base = base;
        }
        for pair in features {
            let (name, value) = parse_feature_pair(pair)?;
            self.features
                .insert(name.to_string(), toml::Value::String(value.to_string()));
        }
        Ok(())
    }

    /// The configured format name, if any.
    pub fn format(&self) -> Option<&str> {
        self.serializer.format.as_deref()
    }

    /// The configured base location, if any.
    pub fn base(&self) -> Option<Location> {
        self.serializer.base.as_deref().map(Location::new)
    }

    // =========================================================================
    // FEATURES
    // =========================================================================

    /// Resolve every configured feature name and render its value as text.
    pub fn feature_values(&self) -> Result<Vec<(Feature, String)>, GraphoutError> {
        self.features
            .iter()
            .map(|(name, value)| {
                let feature = Feature::from_name(name)
                    .ok_or_else(|| GraphoutError::Config(format!("Unknown feature: {}", name)))?;
                Ok((feature, value_text(name, value)?))
            })
            .collect()
    }

    /// Set every configured feature on `serializer`.
    pub fn configure(&self, serializer: &mut Serializer) -> Result<(), GraphoutError> {
        for (feature, value) in self.feature_values()? {
            tracing::debug!(feature = %feature, value = %value, "applying feature");
            serializer.set_feature_string(feature, &value)?;
        }
        Ok(())
    }
}

/// Split `name=value`. The value may itself contain `=`.
pub fn parse_feature_pair(pair: &str) -> Result<(&str, &str), GraphoutError> {
    match pair.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value)),
        _ => Err(GraphoutError::Config(format!(
            "Expected name=value, got '{}'",
            pair
        ))),
    }
}

fn value_text(name: &str, value: &toml::Value) -> Result<String, GraphoutError> {
    match value {
        toml::Value::String(s) => Ok(s.clone()),
        toml::Value::Integer(i) => Ok(i.to_string()),
        toml::Value::Boolean(b) => Ok(if *b { "1" } else { "0" }.to_string()),
        other => Err(GraphoutError::Config(format!(
            "Feature {} must be a string, integer or boolean, got {}",
            name,
            other.type_str()
        ))),
    }
}

// =============================================================================
// TESTS
// =============================================================================
