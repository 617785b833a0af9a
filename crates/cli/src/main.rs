mod cli;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::cli::CliArgs;
use crate::config::FileConfig;

fn main() -> Result<()> {
    // Logs go to stderr; the build itself prints nothing on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    let config = FileConfig::load(args.config.as_deref())
        .context("failed to load configuration")?;
    let request = config.resolve(args)?;

    info!(
        rules = %request.rules_path.display(),
        template = %request.template_path.display(),
        region = %request.params.region,
        cluster = %request.params.cluster,
        environment = %request.params.environment,
        "building schedule"
    );

    let summary = ecschedule_rules::execute(&request).with_context(|| {
        format!(
            "failed to build {} from {}",
            request.output_path.display(),
            request.rules_path.display()
        )
    })?;

    info!(
        output = %summary.output_path.display(),
        rendered = summary.rendered.len(),
        skipped = summary.skipped.len(),
        bytes = summary.bytes,
        written = summary.written,
        "build complete"
    );
    Ok(())
}
