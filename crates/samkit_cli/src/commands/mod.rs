//! CLI command definitions.
//!
//! Each subcommand runs one slice of the samkit core over its input and
//! prints a human-readable verdict.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use samkit_ids::SamkitConfig;

pub mod arn;
pub mod check;
pub mod logical_id;

/// samkit - template normalization and identifier toolkit
#[derive(Parser)]
#[command(name = "samkit")]
#[command(version, about = "samkit - template normalization and identifier toolkit")]
#[command(long_about = r#"
samkit normalizes infrastructure templates, checks directive shapes, and
verifies the logical ids and ARNs used when templates are expanded.

COMMANDS:
  check       → Normalize, validate and map a template file
  arn         → Verify an ARN and optionally its fields
  logical-id  → Derive and verify a stable logical id

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Validation failure
  4 - Template error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (.yaml, .yml, .json or .toml)
    #[arg(short, long, global = true, env = "SAMKIT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Load the config file if one was given, else defaults.
    pub fn load_config(&self) -> Result<SamkitConfig> {
        match &self.config {
            Some(path) => Ok(SamkitConfig::from_file(path)?),
            None => Ok(SamkitConfig::default()),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normalize, validate and map a template file
    Check(check::CheckArgs),

    /// Verify an ARN
    Arn(arn::ArnArgs),

    /// Derive and verify a logical id
    #[command(name = "logical-id")]
    LogicalId(logical_id::LogicalIdArgs),
}
