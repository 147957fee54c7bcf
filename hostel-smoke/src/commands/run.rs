//! The `run` command: full smoke sequence with a printed report

use std::path::Path;

use tracing::info;

use super::load_with_overrides;
use crate::cli::{OutputFormat, RunArgs};
use crate::config::SmokeConfig;
use crate::error::SmokeError;
use crate::runner::SmokeRunner;

/// Run the smoke checks and print the report to stdout.
/// Fails with [`SmokeError::ChecksFailed`] when any check failed.
pub async fn run_smoke(config_path: Option<&Path>, args: &RunArgs) -> Result<(), SmokeError> {
    let (mut config, profile) = load_with_overrides(config_path, &args.target)?;
    apply_check_overrides(&mut config, args)?;

    let runner = SmokeRunner::from_config(&config, &profile)?;
    info!("Checks enabled: {:?}", runner.options());
    let report = runner.run().await;

    match args.format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    report.into_result()
}

fn apply_check_overrides(config: &mut SmokeConfig, args: &RunArgs) -> Result<(), SmokeError> {
    // Flags can only switch checks on; the config file decides otherwise
    if args.strict {
        config.checks.strict = true;
    }
    if args.negative {
        config.checks.negative = true;
    }
    if let Some(iterations) = args.iterations {
        config.checks.iterations = iterations;
    }
    config.validate()
}
