//! 日志系统初始化，二进制入口与测试共用

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

/// 安装全局日志订阅器，`RUST_LOG` 优先于 `log_level`
pub fn init_logging(log_level: &str, log_format: LogFormat) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .context("初始化JSON日志格式失败")?,
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init()
            .context("初始化Pretty日志格式失败")?,
    }

    tracing::debug!(level = log_level, format = %log_format, "日志系统初始化完成");
    Ok(())
}

/// 按配置文件中的 `[logging]` 段初始化
pub fn init_logging_from_config(config: &LoggingConfig) -> Result<()> {
    init_logging(&config.level, config.format)
}
