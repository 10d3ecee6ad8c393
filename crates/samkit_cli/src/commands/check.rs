//! Check command - Normalize, validate and map a template.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use tracing::info;

use samkit_template::{
    DirectiveValidator, DocumentFormat, NormalizeOptions, Normalizer, TemplateMapper,
};

use super::Cli;

#[derive(Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Yaml,
    Json,
}

impl From<FormatArg> for DocumentFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Yaml => DocumentFormat::Yaml,
            FormatArg::Json => DocumentFormat::Json,
        }
    }
}

#[derive(Args)]
pub struct CheckArgs {
    /// Template file to check
    template: PathBuf,

    /// Input format (sniffed from the content if omitted)
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    /// Report line/column for every problem
    #[arg(long)]
    locations: bool,

    /// Print directive shape violations but do not fail
    #[arg(long)]
    allow_violations: bool,
}

pub fn execute(cli: &Cli, args: &CheckArgs) -> Result<()> {
    info!("Checking template: {:?}", args.template);

    let config = cli.load_config()?;
    let bytes = fs::read(&args.template)
        .with_context(|| format!("Template not found: {:?}", args.template))?;

    let mut options = NormalizeOptions::new();
    if let Some(format) = args.format {
        options = options.with_format(format.into());
    }
    if args.locations || config.track_locations {
        options = options.with_locations();
    }

    let document = Normalizer::new(options).normalize_bytes(&bytes)?;
    println!("📄 Normalized {:?}", args.template);

    let report = DirectiveValidator::validate_document(&document);
    if report.valid {
        println!("   ✅ {} directive(s), all well-formed", report.checked);
    } else {
        println!(
            "   ❌ {} of {} directive(s) malformed:",
            report.violations.len(),
            report.checked
        );
        for violation in &report.violations {
            println!("      - {}", violation);
        }
    }

    let template = TemplateMapper::map_document(&document)?;
    println!(
        "   📦 {} resource(s), {} parameter(s), {} output(s){}",
        template.resources.len(),
        template.parameters.len(),
        template.outputs.len(),
        if template.is_sam() { ", serverless transform" } else { "" }
    );

    if !report.valid && !args.allow_violations {
        anyhow::bail!(
            "Directive validation failed: {} violation(s)",
            report.violations.len()
        );
    }

    println!("✅ Template check passed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::Parser;

    use super::*;
    use crate::commands::Commands;

    fn run(template: &str, extra: &[&str]) -> Result<()> {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(template.as_bytes()).unwrap();
        let path = file.path().to_string_lossy().to_string();

        let mut argv = vec!["samkit", "check", path.as_str()];
        argv.extend_from_slice(extra);
        let cli = Cli::try_parse_from(argv).unwrap();
        match &cli.command {
            Commands::Check(args) => execute(&cli, args),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_check_accepts_well_formed_template() {
        let template = "Resources:\n  Q:\n    Type: AWS::SQS::Queue\n    Properties:\n      QueueName: !Sub '${AWS::StackName}-q'\n";
        assert!(run(template, &[]).is_ok());
    }

    #[test]
    fn test_check_fails_on_violations_unless_allowed() {
        let template = "Resources:\n  Q:\n    Type: AWS::SQS::Queue\n    Properties:\n      QueueName: !Join 'x'\n";
        let err = run(template, &["--locations"]).unwrap_err();
        assert!(err.to_string().contains("validation failed"));
        assert!(run(template, &["--allow-violations"]).is_ok());
    }

    #[test]
    fn test_check_surfaces_template_errors() {
        let err = run("Parameters: {}\n", &[]).unwrap_err();
        assert!(err.downcast_ref::<samkit_template::TemplateError>().is_some());
    }
}
