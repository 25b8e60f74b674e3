//! PMS服务器主程序

use anyhow::{Context, Result};
use clap::Parser;
use pms_admin::{init_logging, PmsConfig};
use pms_service::PatientService;
use pms_storage::{JsonFileStore, MemoryStore, RecordStore};
use pms_web::WebServer;
use std::sync::Arc;
use tracing::{error, info, warn};

/// PMS服务器命令行参数
#[derive(Parser, Debug)]
#[command(name = "pms-server")]
#[command(about = "Patient Management System API 服务器")]
struct Args {
    /// 监听主机
    #[arg(long)]
    host: Option<String>,

    /// 服务器端口
    #[arg(short, long)]
    port: Option<u16>,

    /// 患者数据文件
    #[arg(short, long)]
    data_file: Option<String>,

    /// 配置文件路径
    #[arg(short, long)]
    config: Option<String>,

    /// 日志级别
    #[arg(short, long)]
    log_level: Option<String>,

    /// 先写临时文件再重命名
    #[arg(long)]
    atomic_writes: bool,

    /// 使用内存存储，不读写数据文件
    #[arg(long)]
    in_memory: bool,
}

impl Args {
    /// 命令行参数覆盖配置
    fn apply(&self, config: &mut PmsConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(data_file) = &self.data_file {
            config.storage.data_file = data_file.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if self.atomic_writes {
            config.storage.atomic_writes = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = PmsConfig::load(args.config.as_deref())?;
    args.apply(&mut config);
    config.validate()?;

    // 初始化日志
    init_logging(&config.logging)?;

    info!("启动PMS服务器...");

    let store: Arc<dyn RecordStore> = if args.in_memory {
        warn!("使用内存存储，重启后数据丢失");
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(JsonFileStore::new(&config.storage_config()))
    };
    let service = Arc::new(PatientService::with_policy(store, config.storage_policy()));

    let addr = config.socket_addr()?;
    info!("PMS服务器配置:");
    info!("  监听地址: {}", addr);
    info!("  存储: {}", service.store_description());
    info!("  原子写入: {}", config.storage.atomic_writes);

    let server = WebServer::new(addr, service);
    if let Err(e) = server.run().await {
        error!("服务器运行失败: {}", e);
        return Err(e).context("PMS server failed");
    }

    Ok(())
}
