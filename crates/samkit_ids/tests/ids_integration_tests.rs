//! Integration tests for identifier verification, stability and ARN checks.

use std::thread;

use samkit_ids::{
    ArnError, ArnValidator, IdError, IdentifierError, IdentifierVerifier, SamkitConfig,
    StabilityCache, TranslationPass, VerifierConfig,
};

/// Two passes over the same logical entities mint the same ids.
#[test]
fn test_repeated_passes_are_idempotent() {
    let run = || {
        let mut pass = TranslationPass::new(&SamkitConfig::default());
        let role = pass.mint_logical_id("orders/role", &["Orders", "Function", "Role"]).unwrap();
        let permission = pass
            .mint_hashed_id("orders/permission", "s3:ObjectCreated:*", "OrdersPermission")
            .unwrap();
        let deployment = pass.mint_deployment_id("OrdersApi", "paths: {/orders: {}}").unwrap();
        (role, permission, deployment)
    };

    assert_eq!(run(), run());
}

/// Independent passes on separate threads never observe each other's state.
#[test]
fn test_concurrent_passes_use_independent_state() {
    let handles: Vec<_> = (0..4)
        .map(|_| {
            thread::spawn(|| {
                let mut pass = TranslationPass::default();
                pass.mint_logical_id("api", &["Serverless", "RestApi"]).unwrap()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), "ServerlessRestApi");
    }
}

/// A speculative allocation can be rolled back and retried.
#[test]
fn test_speculative_allocation_rollback() {
    let mut verifier = IdentifierVerifier::new(VerifierConfig::default());

    verifier.verify("OrdersFunctionRole").unwrap();
    assert!(verifier.unregister("OrdersFunctionRole"));
    assert!(verifier.verify("OrdersFunctionRole").is_ok());
    assert_eq!(verifier.known_ids(), vec!["OrdersFunctionRole"]);
}

/// Runtime reserved prefixes apply to later checks only.
#[test]
fn test_runtime_reserved_prefix() {
    let mut verifier = IdentifierVerifier::default();
    verifier.verify("ServerlessThing").unwrap();

    verifier.add_reserved_prefix("Serverless");
    let err = verifier.verify_without_tracking("ServerlessOther").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Logical id 'ServerlessOther' uses reserved prefix 'Serverless'"
    );
}

/// Per-key determinism: same key, same value; different keys hash independently.
#[test]
fn test_hashed_stability_per_key() {
    let mut cache = StabilityCache::default();
    let a1 = cache.check_hashed_stability("a", "X", "P");
    let a2 = cache.check_hashed_stability("a", "X", "P");
    assert_eq!(a1, a2);

    let mut other = StabilityCache::default();
    let b = other.check_hashed_stability("b", "X", "P");
    assert_eq!(a1, b, "identical data and prefix hash identically on a fresh key");

    let c = cache.check_hashed_stability("c", "Y", "P");
    assert_ne!(a1, c);
}

/// Deployment ids change exactly when the spec text changes.
#[test]
fn test_change_sensitivity() {
    let cache = StabilityCache::default();
    let specs = ["a", "b", "openapi: 3.0.1\npaths: {}", "openapi: 3.0.1\npaths: {} "];
    for old in specs {
        for new in specs {
            let change = cache.verify_id_changes("Api", old, new);
            assert_eq!(change.changed(), old != new, "{:?} -> {:?}", old, new);
        }
    }
}

/// Cross-account and cross-region references are caught.
#[test]
fn test_arn_reference_checks() {
    let arn = "arn:aws:lambda:us-east-1:123456789012:function:F";
    assert!(ArnValidator::verify(arn).is_ok());
    assert!(ArnValidator::verify_partition(arn, "aws").is_ok());
    assert!(ArnValidator::verify_region(arn, "us-east-1").is_ok());

    let err = ArnValidator::verify_account_id(arn, "000000000000").unwrap_err();
    assert!(matches!(err, ArnError::FieldMismatch { field: "account id", .. }));

    let wrapped: IdError = ArnValidator::verify_service(arn, "s3").unwrap_err().into();
    assert!(wrapped.to_string().starts_with("ARN error:"));

    assert!(matches!(
        ArnValidator::verify("not-an-arn"),
        Err(ArnError::Malformed { .. })
    ));
}

/// Identifier errors convert into the crate error.
#[test]
fn test_identifier_error_conversion() {
    let mut pass = TranslationPass::default();
    let err: IdError = pass.mint_logical_id("k", &[""]).unwrap_err().into();
    assert!(matches!(err, IdError::Identifier(IdentifierError::Empty)));
}
