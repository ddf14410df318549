use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, ConfigResult, ConfigValidator, ValidationUtils};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    pub bind_address: String,
    pub request_timeout_seconds: u64,
    pub cors_enabled: bool,
    /// 静态前端目录，未设置时不挂载
    #[serde(default)]
    pub web_dir: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:7540".to_string(),
            request_timeout_seconds: 30,
            cors_enabled: true,
            web_dir: None,
        }
    }
}

impl ConfigValidator for ApiConfig {
    fn validate(&self) -> ConfigResult<()> {
        ValidationUtils::validate_socket_address(&self.bind_address, "api.bind_address")?;
        ValidationUtils::validate_timeout_seconds(
            self.request_timeout_seconds,
            "api.request_timeout_seconds",
        )?;

        if let Some(dir) = &self.web_dir {
            if dir.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "api.web_dir cannot be empty when set".to_string(),
                ));
            }
        }

        Ok(())
    }
}
