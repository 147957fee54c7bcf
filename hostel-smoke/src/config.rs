use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use hostel_api_types::{LoginRequest, Role};
use serde::{Deserialize, Serialize};

use crate::error::SmokeError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_PROFILE: &str = "warden";
/// Environment variable that overrides `target.base_url`
pub const BASE_URL_ENV: &str = "API_URL";
const ENV_PREFIX: &str = "HOSTEL_SMOKE";
const MASK: &str = "********";

pub const DEFAULT_CONFIG: &str = r#"# hostel-smoke configuration

[target]
base_url = "http://localhost:3000"
# timeout_secs = 30

[checks]
# Require data.len() == count and object records
strict = false
# Also check that anonymous and bad-password requests are rejected
negative = false
iterations = 1

# Block A warden seeded on the test server
[profiles.warden]
email = "admin1@uni.com"
password = "admin1"
role = "admin"

# [profiles.student]
# email = "student1@uni.com"
# password = "student123"
# role = "student"
"#;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SmokeConfig {
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub checks: ChecksConfig,
    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TargetConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout; unset means the HTTP client default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ChecksConfig {
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub negative: bool,
    #[serde(default = "default_iterations")]
    pub iterations: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProfileConfig {
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_iterations() -> u32 {
    1
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

impl Default for ChecksConfig {
    fn default() -> Self {
        Self {
            strict: false,
            negative: false,
            iterations: default_iterations(),
        }
    }
}

impl ProfileConfig {
    /// The seeded Block A warden
    pub fn warden() -> Self {
        Self {
            email: "admin1@uni.com".to_string(),
            password: "admin1".to_string(),
            role: Some(Role::Admin),
        }
    }

    pub fn credentials(&self) -> LoginRequest {
        LoginRequest::new(self.email.clone(), self.password.clone())
    }
}

impl Default for SmokeConfig {
    fn default() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert(DEFAULT_PROFILE.to_string(), ProfileConfig::warden());
        Self {
            target: TargetConfig::default(),
            checks: ChecksConfig::default(),
            profiles,
        }
    }
}

impl SmokeConfig {
    /// Load from an explicit file, or the default location when it exists,
    /// then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<(Self, Option<PathBuf>), SmokeError> {
        let path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => {
                let default_path = get_config_path();
                default_path.exists().then_some(default_path)
            }
        };

        let config = Self::load_with_env(path.as_deref(), std::env::vars())?;
        Ok((config, path))
    }

    /// Like [`Self::load`] with an explicit file, reading `HOSTEL_SMOKE__*`
    /// and `API_URL` from `vars` instead of the process environment.
    pub fn load_with_env<I>(path: Option<&Path>, vars: I) -> Result<Self, SmokeError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let vars: config::Map<String, String> = vars.into_iter().collect();
        let base_url_override = vars.get(BASE_URL_ENV).cloned();
        Self::build(path, Some(vars), base_url_override)
    }

    /// Layer: built-in defaults, optional file, `HOSTEL_SMOKE__*` variables
    /// from the process environment, then the base URL override.
    pub fn load_from(
        path: Option<&Path>,
        base_url_override: Option<String>,
    ) -> Result<Self, SmokeError> {
        Self::build(path, None, base_url_override)
    }

    fn build(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
        base_url_override: Option<String>,
    ) -> Result<Self, SmokeError> {
        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(path) = path {
            if !path.exists() {
                return Err(SmokeError::config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(File::from(path.to_path_buf()));
        }

        let builder = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .set_override_option("target.base_url", base_url_override)?;

        let config: SmokeConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SmokeError> {
        let base_url = self.target.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(SmokeError::config(format!(
                "target.base_url must be an http(s) URL, got '{}'",
                self.target.base_url
            )));
        }
        if self.target.timeout_secs == Some(0) {
            return Err(SmokeError::config("target.timeout_secs must be at least 1"));
        }
        if self.checks.iterations == 0 {
            return Err(SmokeError::config("checks.iterations must be at least 1"));
        }
        for (name, profile) in &self.profiles {
            if profile.email.trim().is_empty() {
                return Err(SmokeError::config(format!(
                    "profiles.{name}.email cannot be empty"
                )));
            }
            if profile.password.is_empty() {
                return Err(SmokeError::config(format!(
                    "profiles.{name}.password cannot be empty"
                )));
            }
        }
        Ok(())
    }

    pub fn profile(&self, name: &str) -> Result<&ProfileConfig, SmokeError> {
        self.profiles
            .get(name)
            .ok_or_else(|| self.unknown_profile(name))
    }

    pub fn profile_mut(&mut self, name: &str) -> Result<&mut ProfileConfig, SmokeError> {
        let err = self.unknown_profile(name);
        self.profiles.get_mut(name).ok_or(err)
    }

    fn unknown_profile(&self, name: &str) -> SmokeError {
        let known: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        SmokeError::config(format!(
            "Unknown profile '{}' (available: {})",
            name,
            known.join(", ")
        ))
    }

    /// Effective configuration as TOML, with passwords masked
    pub fn to_masked_toml(&self) -> Result<String, SmokeError> {
        let mut masked = self.clone();
        for profile in masked.profiles.values_mut() {
            profile.password = MASK.to_string();
        }
        Ok(toml::to_string_pretty(&masked)?)
    }
}

/// Write the default configuration file, refusing to clobber one unless forced
pub fn write_default_config(path: &Path, force: bool) -> Result<(), SmokeError> {
    if path.exists() && !force {
        return Err(SmokeError::config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, DEFAULT_CONFIG)?;
    Ok(())
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("hostel-smoke/smoke.toml")
    } else {
        PathBuf::from("smoke.toml")
    }
}
