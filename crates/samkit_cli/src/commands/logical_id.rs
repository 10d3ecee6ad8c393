//! Logical-id command - Derive and verify a stable logical id.

use anyhow::Result;
use clap::Args;
use tracing::info;

use samkit_ids::TranslationPass;

use super::Cli;

#[derive(Args)]
pub struct LogicalIdArgs {
    /// Parts concatenated into the id (or the prefix when hashing)
    #[arg(required = true)]
    parts: Vec<String>,

    /// Derive a content-hashed id from this data instead of plain concatenation
    #[arg(long)]
    hash_data: Option<String>,

    /// Treat the parts as a deployment name and the hash data as its spec text
    #[arg(long, requires = "hash_data")]
    deployment: bool,
}

pub fn execute(cli: &Cli, args: &LogicalIdArgs) -> Result<()> {
    let config = cli.load_config()?;
    let mut pass = TranslationPass::new(&config);
    let joined = args.parts.concat();

    let id = match (&args.hash_data, args.deployment) {
        (Some(data), true) => pass.mint_deployment_id(&joined, data)?,
        (Some(data), false) => pass.mint_hashed_id(&joined, data, &joined)?,
        (None, _) => {
            let parts: Vec<&str> = args.parts.iter().map(String::as_str).collect();
            pass.mint_logical_id(&joined, &parts)?
        }
    };

    info!("Derived logical id {}", id);
    println!("{}", id);
    Ok(())
}
