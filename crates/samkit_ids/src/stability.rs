//! Deterministic, memoized logical id derivation.
//!
//! Re-running a translation over an unchanged entity must yield the same
//! synthesized id, since the deployment engine reads an id change as
//! "replace this resource". Derivations are therefore pure functions of their
//! input bytes, and the cache pins the first derivation per key for the rest
//! of the pass.
//!
//! Derivation contract:
//!
//! - plain: `parts` concatenated in order with no separator, keeping only
//!   ASCII alphanumerics
//! - hashed: `prefix` followed by the first `hash_length` (default 10)
//!   lowercase hex digits of SHA-256 over the UTF-8 bytes of `data`
//! - deployment: hashed, with key and prefix `"{name}Deployment"` and the
//!   spec text as data
//!
//! Each scheme memoizes in its own key space ([`IdScheme`]), so a plain
//! derivation can never satisfy a hashed or deployment lookup for the same
//! key string.

use std::collections::HashMap;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::config::StabilityConfig;

/// Derivation scheme; the cache keeps one key space per scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdScheme {
    Plain,
    Hashed,
    Deployment,
}

/// Outcome of comparing the ids derived for two spec texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdChange {
    pub old_id: String,
    pub new_id: String,
}

impl IdChange {
    pub fn changed(&self) -> bool {
        self.old_id != self.new_id
    }
}

/// Memoizes derived ids by stable key for one translation pass.
#[derive(Debug, Clone)]
pub struct StabilityCache {
    ids: HashMap<(IdScheme, String), String>,
    hash_length: usize,
}

impl Default for StabilityCache {
    fn default() -> Self {
        Self::new(StabilityConfig::default())
    }
}

impl StabilityCache {
    pub fn new(config: StabilityConfig) -> Self {
        Self {
            ids: HashMap::new(),
            hash_length: config.hash_length.clamp(1, 64),
        }
    }

    /// Id for `key` derived from the concatenation of `parts`. Only the
    /// first call for a key derives; later calls return the cached id
    /// whatever `parts` they pass.
    pub fn check_stability(&mut self, key: &str, parts: &[&str]) -> String {
        self.memoize(IdScheme::Plain, key, || derive_plain_id(parts))
    }

    /// Id for `key` derived from a content hash of `data`, memoized by `key`.
    pub fn check_hashed_stability(&mut self, key: &str, data: &str, prefix: &str) -> String {
        let hash_length = self.hash_length;
        self.memoize(IdScheme::Hashed, key, || derive_hashed_id(prefix, data, hash_length))
    }

    /// Id of the deployment resource that belongs to `name`; changes exactly
    /// when `spec_text` changes.
    pub fn check_deployment_id_stability(&mut self, name: &str, spec_text: &str) -> String {
        let key = deployment_prefix(name);
        let hash_length = self.hash_length;
        self.memoize(IdScheme::Deployment, &key, || {
            derive_hashed_id(&key, spec_text, hash_length)
        })
    }

    /// Compare the deployment ids derived from two spec texts without touching
    /// any cache.
    pub fn verify_id_changes(&self, name: &str, old_spec: &str, new_spec: &str) -> IdChange {
        let prefix = deployment_prefix(name);
        IdChange {
            old_id: derive_hashed_id(&prefix, old_spec, self.hash_length),
            new_id: derive_hashed_id(&prefix, new_spec, self.hash_length),
        }
    }

    pub fn get(&self, scheme: IdScheme, key: &str) -> Option<&str> {
        self.ids
            .get(&(scheme, key.to_string()))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    fn memoize(&mut self, scheme: IdScheme, key: &str, derive: impl FnOnce() -> String) -> String {
        let slot = (scheme, key.to_string());
        if let Some(id) = self.ids.get(&slot) {
            return id.clone();
        }
        let id = derive();
        debug!("Derived {:?} id {} for key {}", scheme, id, key);
        self.ids.insert(slot, id.clone());
        id
    }

    /// Drop every memoized id, for the start of a fresh pass.
    pub fn clear(&mut self) {
        debug!("Clearing {} memoized id(s)", self.ids.len());
        self.ids.clear();
    }
}

/// Concatenate `parts`, keeping ASCII alphanumerics only.
pub fn derive_plain_id(parts: &[&str]) -> String {
    parts
        .iter()
        .flat_map(|part| part.chars())
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// `prefix` + first `hash_length` hex digits of SHA-256(`data`).
pub fn derive_hashed_id(prefix: &str, data: &str, hash_length: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data.as_bytes());
    let digest = hex::encode(hasher.finalize());
    let hash_length = hash_length.clamp(1, digest.len());
    format!("{}{}", prefix, &digest[..hash_length])
}

fn deployment_prefix(name: &str) -> String {
    format!("{}Deployment", name)
}
