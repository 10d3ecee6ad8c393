//! Arn command - Verify a fully-qualified resource name.

use anyhow::Result;
use clap::Args;
use tracing::info;

use samkit_ids::ArnValidator;

#[derive(Args)]
pub struct ArnArgs {
    /// ARN to verify
    arn: String,

    /// Expected partition
    #[arg(long)]
    partition: Option<String>,

    /// Expected service
    #[arg(long)]
    service: Option<String>,

    /// Expected region
    #[arg(long)]
    region: Option<String>,

    /// Expected account id
    #[arg(long)]
    account: Option<String>,
}

pub fn execute(args: &ArnArgs) -> Result<()> {
    info!("Verifying ARN: {}", args.arn);

    let arn = ArnValidator::verify(&args.arn)?;
    if let Some(partition) = &args.partition {
        ArnValidator::verify_partition(&args.arn, partition)?;
    }
    if let Some(service) = &args.service {
        ArnValidator::verify_service(&args.arn, service)?;
    }
    if let Some(region) = &args.region {
        ArnValidator::verify_region(&args.arn, region)?;
    }
    if let Some(account) = &args.account {
        ArnValidator::verify_account_id(&args.arn, account)?;
    }

    println!("✅ {}", arn);
    println!("   partition: {}", arn.partition);
    println!("   service:   {}", arn.service);
    println!("   region:    {}", if arn.region.is_empty() { "-" } else { &arn.region });
    println!("   account:   {}", if arn.account_id.is_empty() { "-" } else { &arn.account_id });
    println!("   resource:  {}", arn.resource);
    Ok(())
}
