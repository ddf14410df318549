use std::path::Path;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use super::{ApiConfig, DatabaseConfig, LoggingConfig};
use crate::config::{ConfigError, ConfigResult, ConfigValidator};

/// 未显式指定配置文件时依次查找的位置
const DEFAULT_CONFIG_PATHS: [&str; 3] = [
    "config/tracker.toml",
    "tracker.toml",
    "/etc/task-tracker/config.toml",
];

const ENV_PREFIX: &str = "TRACKER";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// 加载配置：默认值 < 配置文件 < `TRACKER__*` 环境变量
    pub fn load(config_path: Option<&str>) -> ConfigResult<Self> {
        let defaults = AppConfig::default();
        let mut builder = ConfigBuilder::builder()
            .set_default("database.url", defaults.database.url.as_str())?
            .set_default(
                "database.max_connections",
                i64::from(defaults.database.max_connections),
            )?
            .set_default(
                "database.min_connections",
                i64::from(defaults.database.min_connections),
            )?
            .set_default(
                "database.connection_timeout_seconds",
                defaults.database.connection_timeout_seconds as i64,
            )?
            .set_default("database.list_limit", i64::from(defaults.database.list_limit))?
            .set_default("api.bind_address", defaults.api.bind_address.as_str())?
            .set_default(
                "api.request_timeout_seconds",
                defaults.api.request_timeout_seconds as i64,
            )?
            .set_default("api.cors_enabled", defaults.api.cors_enabled)?
            .set_default("logging.level", defaults.logging.level.as_str())?
            .set_default("logging.format", defaults.logging.format.as_str())?;

        match config_path {
            Some(path) => {
                if !Path::new(path).exists() {
                    return Err(ConfigError::File(format!("配置文件不存在: {path}")));
                }
                builder = builder.add_source(File::new(path, FileFormat::Toml));
            }
            None => {
                if let Some(path) = DEFAULT_CONFIG_PATHS
                    .iter()
                    .find(|path| Path::new(path).exists())
                {
                    builder = builder.add_source(File::new(path, FileFormat::Toml));
                }
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    pub fn from_toml(toml_str: &str) -> ConfigResult<Self> {
        let config: AppConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl ConfigValidator for AppConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.database.validate()?;
        self.api.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
