use std::path::PathBuf;

use config::{Config, FileFormat};
use serde::{Deserialize, Serialize};
use shardline_lite::backend::BackendConfig;
use shardline_sdk::types::ListLimit;

use crate::error::CliConfigError;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub state_file: Option<PathBuf>,
    pub page_size: Option<usize>,
    pub shard_limit: Option<u32>,
}

fn config_dir() -> Result<PathBuf, CliConfigError> {
    let mut path = if cfg!(target_os = "windows") {
        dirs::config_dir().ok_or(CliConfigError::DirNotFound)?
    } else {
        let mut home = dirs::home_dir().ok_or(CliConfigError::DirNotFound)?;
        home.push(".config");
        home
    };
    path.push("shardline");
    Ok(path)
}

fn config_path() -> Result<PathBuf, CliConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

fn file_source(path: &std::path::Path) -> config::File<config::FileSourceFile, FileFormat> {
    config::File::from(path).format(FileFormat::Toml)
}

pub fn load_config_file() -> Result<CliConfig, CliConfigError> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(CliConfig::default());
    }
    let builder = Config::builder().add_source(file_source(&path));
    Ok(builder.build()?.try_deserialize::<CliConfig>()?)
}

pub fn load_cli_config() -> Result<CliConfig, CliConfigError> {
    let path = config_path()?;
    let mut builder = Config::builder();
    if path.exists() {
        builder = builder.add_source(file_source(&path));
    }
    builder = builder.add_source(config::Environment::with_prefix("SHARDLINE"));
    Ok(builder.build()?.try_deserialize::<CliConfig>()?)
}

#[derive(
    Debug, Clone, Copy, clap::ValueEnum, strum::Display, strum::EnumString, strum::VariantNames,
)]
#[clap(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ConfigKey {
    StateFile,
    PageSize,
    ShardLimit,
}

impl CliConfig {
    pub fn get(&self, key: ConfigKey) -> Option<String> {
        match key {
            ConfigKey::StateFile => self.state_file.as_ref().map(|p| p.display().to_string()),
            ConfigKey::PageSize => self.page_size.map(|v| v.to_string()),
            ConfigKey::ShardLimit => self.shard_limit.map(|v| v.to_string()),
        }
    }

    pub fn set(&mut self, key: ConfigKey, value: String) -> Result<(), CliConfigError> {
        let invalid = |value: String| CliConfigError::InvalidValue(key.to_string(), value);
        match key {
            ConfigKey::StateFile => {
                if value.is_empty() {
                    return Err(invalid(value));
                }
                self.state_file = Some(PathBuf::from(value));
            }
            ConfigKey::PageSize => match value.parse::<usize>() {
                Ok(size) if size > 0 => self.page_size = Some(size),
                _ => return Err(invalid(value)),
            },
            ConfigKey::ShardLimit => match value.parse::<u32>() {
                Ok(limit) if limit > 0 => self.shard_limit = Some(limit),
                _ => return Err(invalid(value)),
            },
        }
        Ok(())
    }

    pub fn unset(&mut self, key: ConfigKey) {
        match key {
            ConfigKey::StateFile => self.state_file = None,
            ConfigKey::PageSize => self.page_size = None,
            ConfigKey::ShardLimit => self.shard_limit = None,
        }
    }

    /// Where service state lives between runs, next to the config file unless
    /// configured otherwise.
    pub fn state_file(&self) -> Result<PathBuf, CliConfigError> {
        match &self.state_file {
            Some(path) => Ok(path.clone()),
            None => Ok(config_dir()?.join("state.json")),
        }
    }

    /// Page size used when auto-paginating, capped per operation by the SDK.
    pub fn page_size(&self) -> usize {
        self.page_size.unwrap_or(ListLimit::DEFAULT.as_usize())
    }

    pub fn backend_config(&self) -> BackendConfig {
        let mut config = BackendConfig::default();
        if let Some(shard_limit) = self.shard_limit {
            config.shard_limit = shard_limit;
        }
        config
    }
}

pub fn save_cli_config(config: &CliConfig) -> Result<PathBuf, CliConfigError> {
    let path = config_path()?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(CliConfigError::Write)?;
    }

    let toml = toml::to_string(config).map_err(CliConfigError::Serialize)?;
    std::fs::write(&path, toml).map_err(CliConfigError::Write)?;

    Ok(path)
}

pub fn set_config_value(key: ConfigKey, value: String) -> Result<PathBuf, CliConfigError> {
    let mut config = load_config_file().unwrap_or_default();
    config.set(key, value)?;
    save_cli_config(&config)
}

pub fn unset_config_value(key: ConfigKey) -> Result<PathBuf, CliConfigError> {
    let mut config = load_config_file().unwrap_or_default();
    config.unset(key);
    save_cli_config(&config)
}
