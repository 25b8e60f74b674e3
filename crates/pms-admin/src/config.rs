//! 配置管理
//!
//! 配置按以下顺序叠加，后者覆盖前者：
//! 1. 内置默认值
//! 2. TOML配置文件（可选）
//! 3. `PMS__` 前缀的环境变量，例如 `PMS__SERVER__PORT=9000`

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use pms_core::PmsError;
use pms_service::StoragePolicy;
use pms_storage::StorageConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// PMS系统完整配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PmsConfig {
    /// 服务器配置
    pub server: ServerConfig,
    /// 存储配置
    pub storage: StorageSettings,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听主机
    pub host: String,
    /// 监听端口
    pub port: u16,
}

/// 存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// 患者数据文件路径
    pub data_file: String,
    /// 先写临时文件再重命名
    pub atomic_writes: bool,
    /// 写入失败时是否向调用方返回错误
    pub fail_on_write_error: bool,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别或过滤指令，如 `info`、`pms_web=debug,info`
    pub level: String,
    /// 是否输出事件目标
    pub with_target: bool,
}

impl Default for PmsConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
            },
            storage: StorageSettings {
                data_file: "patients.json".to_string(),
                atomic_writes: false,
                fail_on_write_error: false,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                with_target: true,
            },
        }
    }
}

impl PmsConfig {
    /// 加载配置
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("storage.data_file", defaults.storage.data_file)?
            .set_default("storage.atomic_writes", defaults.storage.atomic_writes)?
            .set_default("storage.fail_on_write_error", defaults.storage.fail_on_write_error)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.with_target", defaults.logging.with_target)?;

        if let Some(path) = config_path {
            debug!("Loading configuration file {}", path);
            builder = builder.add_source(File::with_name(path).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix("PMS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// 验证配置
    pub fn validate(&self) -> pms_core::Result<()> {
        if self.server.port == 0 {
            return Err(PmsError::Config("server.port must not be 0".to_string()));
        }
        if self.storage.data_file.trim().is_empty() {
            return Err(PmsError::Config("storage.data_file must not be empty".to_string()));
        }
        if EnvFilter::try_new(&self.logging.level).is_err() {
            return Err(PmsError::Config(format!(
                "invalid logging.level: {}",
                self.logging.level
            )));
        }
        Ok(())
    }

    /// 监听地址
    pub fn socket_addr(&self) -> pms_core::Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| PmsError::Config(format!("invalid listen address: {}", e)))
    }

    pub fn storage_config(&self) -> StorageConfig {
        StorageConfig {
            data_file: self.storage.data_file.clone(),
            atomic_writes: self.storage.atomic_writes,
        }
    }

    pub fn storage_policy(&self) -> StoragePolicy {
        StoragePolicy {
            fail_on_write_error: self.storage.fail_on_write_error,
        }
    }
}
