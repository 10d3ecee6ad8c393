//! Logical id verification and the per-pass id registry.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::config::VerifierConfig;
use crate::error::IdentifierError;

static LOGICAL_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9]*$").expect("logical id pattern is valid"));

/// Verifies synthesized logical ids and remembers the ones accepted in the
/// current translation pass.
///
/// One verifier belongs to one pass. Between passes call [`clear`](Self::clear)
/// or build a new instance; reserved prefixes survive `clear`.
#[derive(Debug, Clone)]
pub struct IdentifierVerifier {
    known: BTreeSet<String>,
    reserved_prefixes: Vec<String>,
    max_length: usize,
}

impl Default for IdentifierVerifier {
    fn default() -> Self {
        Self::new(VerifierConfig::default())
    }
}

impl IdentifierVerifier {
    pub fn new(config: VerifierConfig) -> Self {
        Self {
            known: BTreeSet::new(),
            reserved_prefixes: config.reserved_prefixes,
            max_length: config.max_length,
        }
    }

    /// Check `id` and register it. Fails on syntax, length, reserved prefix,
    /// or when `id` was already registered in this pass.
    pub fn verify(&mut self, id: &str) -> Result<(), IdentifierError> {
        self.verify_without_tracking(id)?;
        if self.known.contains(id) {
            return Err(IdentifierError::Duplicate(id.to_string()));
        }
        debug!("Registering logical id {}", id);
        self.known.insert(id.to_string());
        Ok(())
    }

    /// Syntax, length and reserved-prefix checks only. Never registers and
    /// never reports duplicates.
    pub fn verify_without_tracking(&self, id: &str) -> Result<(), IdentifierError> {
        if id.is_empty() {
            return Err(IdentifierError::Empty);
        }
        let length = id.chars().count();
        if length > self.max_length {
            return Err(IdentifierError::TooLong {
                id: id.to_string(),
                length,
                max: self.max_length,
            });
        }
        if !LOGICAL_ID.is_match(id) {
            return Err(IdentifierError::Malformed(id.to_string()));
        }
        if let Some(prefix) = self.reserved_prefixes.iter().find(|p| id.starts_with(p.as_str())) {
            return Err(IdentifierError::ReservedPrefix {
                id: id.to_string(),
                prefix: prefix.clone(),
            });
        }
        Ok(())
    }

    /// Register `id` without checking it. Returns false if it was already known.
    pub fn register(&mut self, id: impl Into<String>) -> bool {
        self.known.insert(id.into())
    }

    /// Forget `id`, e.g. to roll back a speculative allocation.
    pub fn unregister(&mut self, id: &str) -> bool {
        debug!("Unregistering logical id {}", id);
        self.known.remove(id)
    }

    pub fn is_known(&self, id: &str) -> bool {
        self.known.contains(id)
    }

    /// Registered ids in sorted order.
    pub fn known_ids(&self) -> Vec<&str> {
        self.known.iter().map(String::as_str).collect()
    }

    /// Forget every registered id.
    pub fn clear(&mut self) {
        debug!("Clearing {} registered logical id(s)", self.known.len());
        self.known.clear();
    }

    pub fn add_reserved_prefix(&mut self, prefix: impl Into<String>) {
        let prefix = prefix.into();
        if !self.reserved_prefixes.contains(&prefix) {
            self.reserved_prefixes.push(prefix);
        }
    }

    pub fn reserved_prefixes(&self) -> &[String] {
        &self.reserved_prefixes
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_prefix_and_duplicate() {
        let mut verifier = IdentifierVerifier::default();

        assert_eq!(
            verifier.verify("AWSFoo"),
            Err(IdentifierError::ReservedPrefix {
                id: "AWSFoo".to_string(),
                prefix: "AWS".to_string()
            })
        );
        assert!(verifier.verify("Foo123").is_ok());
        assert_eq!(
            verifier.verify("Foo123"),
            Err(IdentifierError::Duplicate("Foo123".to_string()))
        );
    }

    #[test]
    fn test_syntax_rules() {
        let verifier = IdentifierVerifier::default();
        assert_eq!(verifier.verify_without_tracking(""), Err(IdentifierError::Empty));
        assert!(matches!(
            verifier.verify_without_tracking("1Func"),
            Err(IdentifierError::Malformed(_))
        ));
        assert!(matches!(
            verifier.verify_without_tracking("My-Func"),
            Err(IdentifierError::Malformed(_))
        ));
        assert!(matches!(
            verifier.verify_without_tracking("My_Func"),
            Err(IdentifierError::Malformed(_))
        ));
        assert!(verifier.verify_without_tracking("MyFunc2").is_ok());
    }

    #[test]
    fn test_prefix_check_is_case_sensitive() {
        let verifier = IdentifierVerifier::default();
        assert!(verifier.verify_without_tracking("AwsThing").is_ok());
        assert!(verifier.verify_without_tracking("awsThing").is_ok());
    }

    #[test]
    fn test_max_length() {
        let verifier = IdentifierVerifier::new(VerifierConfig::default().with_max_length(5));
        assert!(verifier.verify_without_tracking("Abcde").is_ok());
        assert_eq!(
            verifier.verify_without_tracking("Abcdef"),
            Err(IdentifierError::TooLong {
                id: "Abcdef".to_string(),
                length: 6,
                max: 5
            })
        );
    }

    #[test]
    fn test_untracked_verification_never_registers() {
        let mut verifier = IdentifierVerifier::default();
        assert!(verifier.verify_without_tracking("Speculative").is_ok());
        assert!(verifier.verify_without_tracking("Speculative").is_ok());
        assert!(!verifier.is_known("Speculative"));

        verifier.verify("Speculative").unwrap();
        assert!(verifier.verify_without_tracking("Speculative").is_ok());
    }

    #[test]
    fn test_registry_controls() {
        let mut verifier = IdentifierVerifier::default();
        assert!(verifier.register("Beta"));
        assert!(!verifier.register("Beta"));
        verifier.verify("Alpha").unwrap();
        assert_eq!(verifier.known_ids(), vec!["Alpha", "Beta"]);

        assert!(verifier.unregister("Alpha"));
        assert!(verifier.verify("Alpha").is_ok());

        verifier.clear();
        assert!(verifier.known_ids().is_empty());
        assert!(verifier.verify("Beta").is_ok());
    }

    #[test]
    fn test_added_prefix_survives_clear() {
        let mut verifier = IdentifierVerifier::default();
        verifier.add_reserved_prefix("Sam");
        verifier.clear();
        assert!(matches!(
            verifier.verify("SamThing"),
            Err(IdentifierError::ReservedPrefix { .. })
        ));
    }
}
