//! Fully-qualified resource name (ARN) parsing and checks.
//!
//! Shape: `arn:partition:service:region:account:resource`. Region and account
//! may be empty (global services such as S3); the resource segment may itself
//! contain `:` or `/`.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::ArnError;

/// Partitions accepted in the partition segment.
pub const SUPPORTED_PARTITIONS: &[&str] = &[
    "aws",
    "aws-cn",
    "aws-us-gov",
    "aws-iso",
    "aws-iso-b",
    "aws-iso-e",
    "aws-iso-f",
    "aws-eusc",
];

static ARN_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^arn:([^:]*):([^:]*):([^:]*):([^:]*):(.*)$").expect("ARN pattern is valid")
});

/// A parsed ARN.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Arn {
    pub partition: String,
    pub service: String,
    pub region: String,
    pub account_id: String,
    pub resource: String,
}

impl Arn {
    /// Parse and validate an ARN string.
    pub fn parse(arn: &str) -> Result<Self, ArnError> {
        if arn.is_empty() {
            return Err(ArnError::Empty);
        }
        let malformed = |reason: &str| ArnError::Malformed {
            arn: arn.to_string(),
            reason: reason.to_string(),
        };

        let caps = ARN_SHAPE
            .captures(arn)
            .ok_or_else(|| malformed("expected arn:partition:service:region:account:resource"))?;
        let segment = |i: usize| caps.get(i).map_or("", |m| m.as_str()).to_string();

        let parsed = Arn {
            partition: segment(1),
            service: segment(2),
            region: segment(3),
            account_id: segment(4),
            resource: segment(5),
        };

        if !SUPPORTED_PARTITIONS.contains(&parsed.partition.as_str()) {
            return Err(ArnError::UnsupportedPartition {
                arn: arn.to_string(),
                partition: parsed.partition,
            });
        }
        if parsed.service.is_empty() {
            return Err(malformed("service segment is empty"));
        }
        if parsed.resource.is_empty() {
            return Err(malformed("resource segment is empty"));
        }
        Ok(parsed)
    }
}

impl FromStr for Arn {
    type Err = ArnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Arn::parse(s)
    }
}

impl fmt::Display for Arn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "arn:{}:{}:{}:{}:{}",
            self.partition, self.service, self.region, self.account_id, self.resource
        )
    }
}

/// Stateless ARN checks used when assembling cross-resource references.
pub struct ArnValidator;

impl ArnValidator {
    pub fn verify(arn: &str) -> Result<Arn, ArnError> {
        let parsed = Arn::parse(arn)?;
        debug!("Verified ARN {}", arn);
        Ok(parsed)
    }

    pub fn verify_partition(arn: &str, expected: &str) -> Result<(), ArnError> {
        let parsed = Arn::parse(arn)?;
        expect_field(arn, "partition", &parsed.partition, expected)
    }

    pub fn verify_service(arn: &str, expected: &str) -> Result<(), ArnError> {
        let parsed = Arn::parse(arn)?;
        expect_field(arn, "service", &parsed.service, expected)
    }

    pub fn verify_region(arn: &str, expected: &str) -> Result<(), ArnError> {
        let parsed = Arn::parse(arn)?;
        expect_field(arn, "region", &parsed.region, expected)
    }

    pub fn verify_account_id(arn: &str, expected: &str) -> Result<(), ArnError> {
        let parsed = Arn::parse(arn)?;
        expect_field(arn, "account id", &parsed.account_id, expected)
    }
}

fn expect_field(
    arn: &str,
    field: &'static str,
    actual: &str,
    expected: &str,
) -> Result<(), ArnError> {
    if actual == expected {
        Ok(())
    } else {
        Err(ArnError::FieldMismatch {
            arn: arn.to_string(),
            field,
            expected: expected.to_string(),
            actual: actual.to_string(),
        })
    }
}
