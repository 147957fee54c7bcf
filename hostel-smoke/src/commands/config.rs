//! Configuration management command implementations

use std::path::Path;

use tracing::info;

use crate::cli::ConfigCommands;
use crate::config::{get_config_path, write_default_config, SmokeConfig};
use crate::error::SmokeError;

/// Handle configuration management operations
pub async fn handle_config_command(
    config_path: Option<&Path>,
    action: &ConfigCommands,
) -> Result<(), SmokeError> {
    match action {
        ConfigCommands::Show => show_config(config_path),
        ConfigCommands::Init { force } => init_config(config_path, *force),
        ConfigCommands::Path => {
            println!("{}", get_config_path().display());
            Ok(())
        }
    }
}

/// Print the effective configuration
fn show_config(config_path: Option<&Path>) -> Result<(), SmokeError> {
    let (config, loaded_from) = SmokeConfig::load(config_path)?;
    match loaded_from {
        Some(path) => println!("# loaded from {}", path.display()),
        None => println!("# built-in defaults (no config file)"),
    }
    print!("{}", config.to_masked_toml()?);
    Ok(())
}

/// Write the default configuration to `--config` or the default location
fn init_config(config_path: Option<&Path>, force: bool) -> Result<(), SmokeError> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(get_config_path);
    write_default_config(&path, force)?;
    info!("Wrote default configuration to {}", path.display());
    println!("Created {}", path.display());
    Ok(())
}
