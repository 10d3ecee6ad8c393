//! Per-pass identifier state.

use tracing::info;

use crate::config::SamkitConfig;
use crate::error::IdentifierError;
use crate::stability::StabilityCache;
use crate::verifier::IdentifierVerifier;

/// The identifier state owned by one translation pass: a registry of accepted
/// logical ids and the cache of stable derivations.
///
/// Passes never share state. Build one per pass (or [`reset`](Self::reset)
/// between passes); concurrent passes each need their own instance.
#[derive(Debug, Clone, Default)]
pub struct TranslationPass {
    verifier: IdentifierVerifier,
    cache: StabilityCache,
}

impl TranslationPass {
    pub fn new(config: &SamkitConfig) -> Self {
        Self {
            verifier: IdentifierVerifier::new(config.verifier.clone()),
            cache: StabilityCache::new(config.stability.clone()),
        }
    }

    pub fn verifier(&self) -> &IdentifierVerifier {
        &self.verifier
    }

    pub fn verifier_mut(&mut self) -> &mut IdentifierVerifier {
        &mut self.verifier
    }

    pub fn cache(&self) -> &StabilityCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut StabilityCache {
        &mut self.cache
    }

    /// Derive the stable id for `key` from `parts`, then verify and register it.
    pub fn mint_logical_id(&mut self, key: &str, parts: &[&str]) -> Result<String, IdentifierError> {
        let id = self.cache.check_stability(key, parts);
        self.verifier.verify(&id)?;
        Ok(id)
    }

    /// Derive the content-hashed id for `key`, then verify and register it.
    pub fn mint_hashed_id(
        &mut self,
        key: &str,
        data: &str,
        prefix: &str,
    ) -> Result<String, IdentifierError> {
        let id = self.cache.check_hashed_stability(key, data, prefix);
        self.verifier.verify(&id)?;
        Ok(id)
    }

    /// Derive, verify and register the deployment id for `name`.
    pub fn mint_deployment_id(&mut self, name: &str, spec_text: &str) -> Result<String, IdentifierError> {
        let id = self.cache.check_deployment_id_stability(name, spec_text);
        self.verifier.verify(&id)?;
        Ok(id)
    }

    /// Forget every registered id and memoized derivation.
    pub fn reset(&mut self) {
        info!(
            "Resetting translation pass ({} id(s), {} derivation(s))",
            self.verifier.known_ids().len(),
            self.cache.len()
        );
        self.verifier.clear();
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mint_registers_derived_id() {
        let mut pass = TranslationPass::default();
        let id = pass.mint_logical_id("fn-role", &["MyFunction", "Role"]).unwrap();
        assert_eq!(id, "MyFunctionRole");
        assert!(pass.verifier().is_known("MyFunctionRole"));

        // Minting the same key twice in one pass is a duplicate.
        assert_eq!(
            pass.mint_logical_id("fn-role", &["MyFunction", "Role"]),
            Err(IdentifierError::Duplicate("MyFunctionRole".to_string()))
        );
    }

    #[test]
    fn test_mint_rejects_reserved_derivations() {
        let mut pass = TranslationPass::default();
        assert!(matches!(
            pass.mint_logical_id("k", &["AWS", "Thing"]),
            Err(IdentifierError::ReservedPrefix { .. })
        ));
    }

    #[test]
    fn test_reset_starts_a_fresh_pass() {
        let mut pass = TranslationPass::default();
        let first = pass.mint_deployment_id("MyApi", "spec-v1").unwrap();
        pass.reset();
        assert!(pass.cache().is_empty());
        let again = pass.mint_deployment_id("MyApi", "spec-v1").unwrap();
        assert_eq!(first, again);
    }
}
