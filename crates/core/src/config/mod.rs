//! 配置管理
//!
//! 配置按以下优先级合并（后者覆盖前者）：
//!
//! 1. 内置默认值
//! 2. TOML 配置文件
//! 3. 以 `TRACKER` 为前缀的环境变量，层级分隔符为 `__`，
//!    例如 `TRACKER__API__BIND_ADDRESS=0.0.0.0:7540`
//!
//! 每个配置段都实现 [`ConfigValidator`]，加载完成后统一校验。

pub mod models;
pub mod validation;

pub use models::{ApiConfig, AppConfig, DatabaseConfig, LogFormat, LoggingConfig};
pub use validation::{ConfigValidator, ValidationUtils};

/// 配置错误结果类型
pub type ConfigResult<T> = Result<T, ConfigError>;

/// 配置错误枚举
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("File error: {0}")]
    File(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Configuration(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::File(err.to_string())
    }
}

impl From<ConfigError> for crate::TrackerError {
    fn from(err: ConfigError) -> Self {
        crate::TrackerError::Configuration(err.to_string())
    }
}
