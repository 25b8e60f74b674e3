//! # PMS服务模块
//!
//! 在记录存储之上提供患者查询与创建功能：
//! - 查询服务：全部列出、按ID获取、按字段排序
//! - 变更服务：不存在时创建，写入前串行化

pub mod mutation;
pub mod query;
pub mod service;

// 重新导出主要类型
pub use mutation::CreateAck;
pub use query::{SortField, SortOrder};
pub use service::{PatientService, StoragePolicy};
