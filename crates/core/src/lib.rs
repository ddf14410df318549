pub mod config;
pub mod errors;
pub mod logging;

pub use config::{AppConfig, ConfigError, ConfigResult};
pub use errors::{TrackerError, TrackerResult};
