//! # samkit_template
//!
//! Template normalization, directive validation and model mapping for samkit.
//!
//! Infrastructure templates mix plain data with directives (`!Ref`,
//! `!GetAtt`, `Fn::Sub`, ...) that a deployment engine resolves later. This
//! crate never evaluates them; it brings every spelling into one canonical
//! form, checks each directive's shape and projects the result into a typed
//! [`Template`].
//!
//! ## Pipeline
//!
//! - **Parse**: YAML or JSON bytes (sniffed or hinted) into a tagged source tree
//! - **Normalize**: shorthand and long-form directives into [`Node::Directive`]
//! - **Validate**: every directive against its shape rule, all violations collected
//! - **Map**: the normalized tree into [`Template`]
//!
//! ## Example
//!
//! ```rust,no_run
//! use samkit_template::{DirectiveValidator, NormalizeOptions, Normalizer, TemplateMapper};
//!
//! let yaml = b"Resources:\n  Fn:\n    Type: AWS::Serverless::Function\n    Properties:\n      Role: !GetAtt MyRole.Arn\n";
//!
//! let document = Normalizer::new(NormalizeOptions::new().with_locations())
//!     .normalize_bytes(yaml)
//!     .unwrap();
//!
//! let report = DirectiveValidator::validate_document(&document);
//! for violation in &report.violations {
//!     eprintln!("{}", violation);
//! }
//!
//! let template = TemplateMapper::map_document(&document).unwrap();
//! assert_eq!(template.resources.len(), 1);
//! ```

pub mod directive;
pub mod error;
pub mod location;
pub mod mapper;
pub mod model;
pub mod node;
pub mod normalizer;
pub mod source;
pub mod validator;

pub use directive::DirectiveKind;
pub use error::{TemplateError, TemplateResult};
pub use location::{Location, LocationTable};
pub use mapper::TemplateMapper;
pub use model::{Output, Parameter, Resource, Template, SERVERLESS_TRANSFORM};
pub use node::{Directive, Mapping, Node, Scalar};
pub use normalizer::{NormalizeOptions, NormalizedDocument, Normalizer};
pub use source::{DocumentFormat, SourceNode, SourceTag, SourceValue};
pub use validator::{DirectiveValidator, ShapeMismatch, ShapeViolation, ValidationReport};
