//! Command implementations for the hostel-smoke CLI

pub mod config;
pub mod login;
pub mod run;

pub use config::*;
pub use login::*;
pub use run::*;

use std::path::Path;
use tracing::debug;

use crate::cli::TargetArgs;
use crate::config::{SmokeConfig, DEFAULT_PROFILE};
use crate::error::SmokeError;

/// Load the layered config and apply target flags on top.
/// Returns the config and the selected profile name.
pub(crate) fn load_with_overrides(
    config_path: Option<&Path>,
    target: &TargetArgs,
) -> Result<(SmokeConfig, String), SmokeError> {
    let (config, loaded_from) = SmokeConfig::load(config_path)?;
    match &loaded_from {
        Some(path) => debug!("Loaded configuration from {}", path.display()),
        None => debug!("No configuration file, using defaults"),
    }

    apply_target_overrides(config, target)
}

pub(crate) fn apply_target_overrides(
    mut config: SmokeConfig,
    target: &TargetArgs,
) -> Result<(SmokeConfig, String), SmokeError> {
    let profile = target
        .profile
        .clone()
        .unwrap_or_else(|| DEFAULT_PROFILE.to_string());

    if let Some(base_url) = &target.base_url {
        config.target.base_url = base_url.clone();
    }
    if let Some(timeout_secs) = target.timeout_secs {
        config.target.timeout_secs = Some(timeout_secs);
    }

    let selected = config.profile_mut(&profile)?;
    if let Some(email) = &target.email {
        selected.email = email.clone();
    }
    if let Some(password) = &target.password {
        selected.password = password.clone();
    }

    config.validate()?;
    Ok((config, profile))
}
