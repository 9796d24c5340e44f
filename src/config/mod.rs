//! Configuration loading
//!
//! Sources are layered from lowest to highest priority:
//!
//! 1. **Defaults** - see [`DirectrixConfig::default`]
//! 2. **Config file** - `--config <path>`, else `<state_dir>/directrix.yml` when present
//! 3. **Environment variables** - `DIRECTRIX_*`
//! 4. **Command line** - `--state-dir`

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Config file looked up in the state directory when no path is given
pub const CONFIG_FILE: &str = "directrix.yml";

const ENV_PREFIX: &str = "DIRECTRIX_";

/// Keys read from `DIRECTRIX_*`; other variables with the prefix are ignored
const ENV_KEYS: [&str; 6] = [
    "state_dir",
    "bosh_path",
    "terraform_path",
    "aws_path",
    "bosh_deployment_dir",
    "command_timeout_secs",
];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DirectrixConfig {
    /// Directory holding the persisted environment record.
    pub state_dir: PathBuf,

    /// `bosh` CLI used to interpolate manifests and create/delete directors.
    pub bosh_path: String,

    /// `terraform` CLI used to read provisioning outputs.
    pub terraform_path: String,

    /// `aws` CLI used to describe CloudFormation stacks.
    pub aws_path: String,

    /// Checkout of the BOSH deployment manifests (`bosh.yml` and ops files).
    pub bosh_deployment_dir: PathBuf,

    /// Per-command timeout for the external CLIs; unset means no timeout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_timeout_secs: Option<u64>,
}

impl Default for DirectrixConfig {
    fn default() -> Self {
        Self {
            state_dir: PathBuf::from("."),
            bosh_path: "bosh".to_string(),
            terraform_path: "terraform".to_string(),
            aws_path: "aws".to_string(),
            bosh_deployment_dir: PathBuf::from("bosh-deployment"),
            command_timeout_secs: None,
        }
    }
}

impl DirectrixConfig {
    pub fn command_timeout(&self) -> Option<Duration> {
        self.command_timeout_secs.map(Duration::from_secs)
    }

    pub fn load(config_path: Option<&Path>, state_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(config_path, state_dir)?.extract()?;
        tracing::debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// The layered sources, before extraction.
    fn figment(config_path: Option<&Path>, state_dir: Option<&Path>) -> Result<Figment, ConfigError> {
        let file = match config_path {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => path.to_path_buf(),
            // A missing default file is skipped by the provider
            None => Self::base_dir(state_dir).join(CONFIG_FILE),
        };

        let mut figment = Figment::from(Serialized::defaults(Self::default()))
            .merge(Yaml::file(file))
            .merge(env());
        if let Some(dir) = state_dir {
            figment = figment.merge(Serialized::default("state_dir", dir));
        }
        Ok(figment)
    }

    /// Directory the default config file is looked up in.
    fn base_dir(state_dir: Option<&Path>) -> PathBuf {
        state_dir.map(Path::to_path_buf).unwrap_or_else(|| {
            Figment::from(env())
                .extract_inner("state_dir")
                .unwrap_or_else(|_| PathBuf::from("."))
        })
    }
}

fn env() -> Env {
    Env::prefixed(ENV_PREFIX).only(&ENV_KEYS)
}
