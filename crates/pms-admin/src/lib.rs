//! # PMS管理模块
//!
//! 提供配置加载与日志初始化等运维功能

pub mod config;
pub mod logging;

pub use config::{LoggingConfig, PmsConfig, ServerConfig, StorageSettings};
pub use logging::init_logging;
