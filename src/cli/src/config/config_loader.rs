use anyhow::{Context, Result};
use config::{Config as RConfig, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, ENV_PREFIX, MIN_POLL_INTERVAL_MS, POLL_INTERVAL_MS,
};
use lens_aws::AwsConfig;
use lens_common::constants::DEFAULT_LOG_GROUP_PREFIX;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Config {
    /// Unset means the SDK's default credential chain, which honours `AWS_PROFILE`.
    #[serde(default)]
    pub aws_init_type: Option<AwsConfig>,
    /// Unset means the SDK's region provider chain.
    #[serde(default)]
    pub aws_region: Option<String>,

    pub poll_interval_ms: u64,
    pub log_group_prefix: String,
    pub resolve_build_logs_config: bool,

    #[serde(default)]
    pub log_file: Option<PathBuf>,

    pub config_sources: Vec<String>,
}

impl Config {
    pub fn aws_init_type(&self) -> AwsConfig {
        self.aws_init_type.clone().unwrap_or(AwsConfig::Env)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Values given on the command line; they win over every other layer.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub profile: Option<String>,
    pub region: Option<String>,
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    pub fn load(overrides: &ConfigOverrides) -> Result<Config> {
        let mut builder = RConfig::builder()
            .set_default("poll_interval_ms", POLL_INTERVAL_MS)?
            .set_default("log_group_prefix", DEFAULT_LOG_GROUP_PREFIX)?
            .set_default("resolve_build_logs_config", true)?;

        // an explicit --config must exist, the default location may not
        let (file, required) = match &overrides.config_file {
            Some(path) => (Some(path.clone()), true),
            None => (Self::default_config_path(), false),
        };

        let mut config_sources = vec![];
        if let Some(path) = file {
            if path.exists() {
                config_sources.push(path.display().to_string());
            }
            builder = builder.add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(required),
            );
        }

        builder = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .set_override_option("aws_region", overrides.region.clone())?
            .set_override("config_sources", config_sources)?;

        let mut config: Config = builder
            .build()?
            .try_deserialize()
            .context("failed to parse config file")?;

        // tables merge across layers, so the profile override is applied after deserializing
        if let Some(profile) = &overrides.profile {
            config.aws_init_type = Some(AwsConfig::Profile(profile.clone()));
        }

        anyhow::ensure!(
            config.poll_interval_ms >= MIN_POLL_INTERVAL_MS,
            "poll_interval_ms must be at least {MIN_POLL_INTERVAL_MS}, got {}",
            config.poll_interval_ms
        );

        tracing::debug!(?config, "Loaded configuration");
        Ok(config)
    }
}
