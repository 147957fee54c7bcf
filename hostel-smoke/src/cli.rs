use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::{commands, error::SmokeError};
use commands::*;

#[derive(Debug, Parser)]
#[command(name = "hostel-smoke")]
#[command(about = "Role-based smoke tests for the hostel complaint-management API")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommands (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log in and check the complaint listing
    Run(RunArgs),

    /// Only log in and show the (redacted) session token
    Login(TargetArgs),

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Show version information
    Version,
}

/// Where to connect and who to log in as
#[derive(Debug, Clone, Default, Args)]
pub struct TargetArgs {
    /// API base URL (overrides API_URL and the config file)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Credential profile from the config file
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Override the profile's email
    #[arg(long)]
    pub email: Option<String>,

    /// Override the profile's password
    #[arg(long)]
    pub password: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Require data.len() == count and object records
    #[arg(long)]
    pub strict: bool,

    /// Also check that anonymous and bad-password requests are rejected
    #[arg(long)]
    pub negative: bool,

    /// Repeat the sequence and require identical status codes each time
    #[arg(short = 'n', long)]
    pub iterations: Option<u32>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration (passwords masked)
    Show,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the default configuration file location
    Path,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Cli {
    pub async fn run(&self) -> Result<(), SmokeError> {
        let config = self.config.as_deref();
        match &self.command {
            Some(Commands::Run(args)) => run_smoke(config, args).await,
            Some(Commands::Login(target)) => login_only(config, target).await,
            Some(Commands::Config { action }) => handle_config_command(config, action).await,
            Some(Commands::Version) => self.handle_version().await,
            // No subcommand: run the default smoke sequence
            None => run_smoke(config, &RunArgs::default()).await,
        }
    }

    async fn handle_version(&self) -> Result<(), SmokeError> {
        println!("hostel-smoke version: {}", env!("CARGO_PKG_VERSION"));
        println!("Description: {}", env!("CARGO_PKG_DESCRIPTION"));
        Ok(())
    }
}
