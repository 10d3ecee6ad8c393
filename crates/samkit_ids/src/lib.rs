//! # samkit_ids
//!
//! Identifier machinery used while a template is expanded into output
//! resources.
//!
//! ## Features
//!
//! - **Identifier Verifier**: syntax, length, reserved-prefix and duplicate
//!   checks over an explicit per-pass registry
//! - **Stability Cache**: memoized plain and content-hashed id derivation so
//!   repeated passes mint identical ids
//! - **ARN Validator**: parsing and field checks for fully-qualified names
//!
//! ## Example
//!
//! ```rust
//! use samkit_ids::{ArnValidator, SamkitConfig, TranslationPass};
//!
//! let mut pass = TranslationPass::new(&SamkitConfig::default());
//!
//! let role = pass.mint_logical_id("fn-role", &["OrdersFunction", "Role"]).unwrap();
//! assert_eq!(role, "OrdersFunctionRole");
//!
//! let deployment = pass.mint_deployment_id("OrdersApi", "openapi: 3.0.1").unwrap();
//! assert!(deployment.starts_with("OrdersApiDeployment"));
//!
//! ArnValidator::verify_region("arn:aws:sqs:us-east-1:123456789012:orders", "us-east-1").unwrap();
//! ```

pub mod arn;
pub mod config;
pub mod error;
pub mod pass;
pub mod stability;
pub mod verifier;

pub use arn::{Arn, ArnValidator, SUPPORTED_PARTITIONS};
pub use config::{SamkitConfig, StabilityConfig, VerifierConfig};
pub use error::{ArnError, IdError, IdResult, IdentifierError};
pub use pass::TranslationPass;
pub use stability::{derive_hashed_id, derive_plain_id, IdChange, IdScheme, StabilityCache};
pub use verifier::IdentifierVerifier;
