//! 内存记录存储

use crate::storage::RecordStore;
use async_trait::async_trait;
use pms_core::{RecordMap, Result};
use tokio::sync::RwLock;

/// 进程内存储，不落盘
///
/// 与文件存储语义一致：读取返回完整副本，保存整体覆盖。
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<RecordMap>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: RecordMap) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn load(&self) -> Result<RecordMap> {
        Ok(self.records.read().await.clone())
    }

    async fn save(&self, records: &RecordMap) -> Result<()> {
        *self.records.write().await = records.clone();
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_save_replaces_contents() {
        let store = MemoryStore::new();
        assert!(store.load().await.unwrap().is_empty());

        let mut records = RecordMap::new();
        records.insert("P001".into(), json!({"id": "P001"}));
        store.save(&records).await.unwrap();
        assert_eq!(store.load().await.unwrap(), records);

        store.save(&RecordMap::new()).await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }
}
