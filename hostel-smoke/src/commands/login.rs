//! The `login` command: authenticate only

use std::path::Path;

use tracing::info;

use super::load_with_overrides;
use crate::cli::TargetArgs;
use crate::error::SmokeError;
use crate::runner::SmokeRunner;

/// Log in with the selected profile and print the redacted token
pub async fn login_only(config_path: Option<&Path>, target: &TargetArgs) -> Result<(), SmokeError> {
    let (config, profile) = load_with_overrides(config_path, target)?;
    let email = config.profile(&profile)?.email.clone();
    let runner = SmokeRunner::from_config(&config, &profile)?;

    info!("Logging in to {} as {}", config.target.base_url, email);
    let token = runner.authenticate().await?;

    println!(
        "Logged in to {} as {} (profile '{}'), token {}",
        config.target.base_url, email, profile, token
    );
    Ok(())
}
