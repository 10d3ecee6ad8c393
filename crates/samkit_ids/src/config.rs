//! Configuration for identifier checks and id derivation.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IdError, IdResult};

/// Maximum logical id length accepted by default.
pub const DEFAULT_MAX_LENGTH: usize = 255;

/// Number of hex digits of the content hash kept in hashed ids.
pub const DEFAULT_HASH_LENGTH: usize = 10;

/// Identifier verifier settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Maximum logical id length
    pub max_length: usize,
    /// Case-sensitive prefixes no synthesized id may start with
    pub reserved_prefixes: Vec<String>,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            reserved_prefixes: vec!["AWS".to_string()],
        }
    }
}

impl VerifierConfig {
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn with_reserved_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.reserved_prefixes.push(prefix.into());
        self
    }
}

/// Stability cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilityConfig {
    /// Hex digits of the SHA-256 digest appended to hashed ids (1-64)
    pub hash_length: usize,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            hash_length: DEFAULT_HASH_LENGTH,
        }
    }
}

/// Top-level samkit configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamkitConfig {
    pub verifier: VerifierConfig,
    pub stability: StabilityConfig,
    /// Record source locations while normalizing
    pub track_locations: bool,
}

impl SamkitConfig {
    /// Load a config file; the format follows the extension
    /// (`.yaml`/`.yml`, `.json` or `.toml`).
    pub fn from_file(path: impl AsRef<Path>) -> IdResult<Self> {
        let path = path.as_ref();
        debug!("Reading config from {:?}", path);

        let content = fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        let invalid = |message: String| IdError::Config {
            path: path.to_path_buf(),
            message,
        };

        let config: SamkitConfig = match extension.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| invalid(e.to_string()))?,
            "json" => serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?,
            "toml" => toml::from_str(&content).map_err(|e| invalid(e.to_string()))?,
            other => return Err(invalid(format!("unsupported config extension '{}'", other))),
        };

        config.check().map_err(invalid)?;
        Ok(config)
    }

    fn check(&self) -> Result<(), String> {
        if self.verifier.max_length == 0 {
            return Err("verifier.max_length must be positive".to_string());
        }
        if !(1..=64).contains(&self.stability.hash_length) {
            return Err("stability.hash_length must be between 1 and 64".to_string());
        }
        if self.verifier.reserved_prefixes.iter().any(|p| p.is_empty()) {
            return Err("verifier.reserved_prefixes must not contain empty prefixes".to_string());
        }
        Ok(())
    }
}
