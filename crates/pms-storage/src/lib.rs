//! # PMS存储模块
//!
//! 负责患者记录文件的整体读取与覆盖写入。

pub mod memory;
pub mod storage;

pub use memory::MemoryStore;
pub use storage::*;
