//! 患者服务
//!
//! 持有注入的记录存储，查询与变更操作分别在 `query` 和 `mutation` 模块中实现。

use pms_core::{PmsError, RecordMap, Result};
use pms_storage::RecordStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;

/// 存储写入失败时的处理策略
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoragePolicy {
    /// 为 `true` 时写入失败直接返回错误，否则仅记录日志
    #[serde(default)]
    pub fail_on_write_error: bool,
}

/// 患者服务
pub struct PatientService {
    pub(crate) store: Arc<dyn RecordStore>,
    pub(crate) policy: StoragePolicy,
    /// 串行化 读取-检查-写入 序列
    pub(crate) write_lock: Mutex<()>,
}

impl PatientService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self::with_policy(store, StoragePolicy::default())
    }

    pub fn with_policy(store: Arc<dyn RecordStore>, policy: StoragePolicy) -> Self {
        Self {
            store,
            policy,
            write_lock: Mutex::new(()),
        }
    }

    pub fn store_description(&self) -> String {
        self.store.describe()
    }

    /// 读取存储，不存在或损坏时降级为空
    pub(crate) async fn load_or_empty(&self) -> Result<RecordMap> {
        match self.store.load().await {
            Ok(records) => Ok(records),
            Err(PmsError::StorageUnavailable(reason)) => {
                warn!("存储不可用，按空存储处理: {}", reason);
                Ok(RecordMap::new())
            }
            Err(e) => Err(e),
        }
    }
}

impl std::fmt::Debug for PatientService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatientService")
            .field("store", &self.store.describe())
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use async_trait::async_trait;
    use pms_core::{PmsError, RecordMap, Result};
    use pms_storage::RecordStore;
    use serde_json::{json, Value};

    /// 读取返回固定内容、写入总是失败的存储
    pub struct ReadOnlyStore {
        pub records: RecordMap,
    }

    #[async_trait]
    impl RecordStore for ReadOnlyStore {
        async fn load(&self) -> Result<RecordMap> {
            Ok(self.records.clone())
        }

        async fn save(&self, _records: &RecordMap) -> Result<()> {
            Err(PmsError::StorageWriteFailed("read-only".to_string()))
        }

        fn describe(&self) -> String {
            "read-only".to_string()
        }
    }

    /// 始终不可用的存储，模拟文件缺失或损坏
    pub struct UnavailableStore;

    #[async_trait]
    impl RecordStore for UnavailableStore {
        async fn load(&self) -> Result<RecordMap> {
            Err(PmsError::StorageUnavailable("corrupt".to_string()))
        }

        async fn save(&self, _records: &RecordMap) -> Result<()> {
            Ok(())
        }

        fn describe(&self) -> String {
            "unavailable".to_string()
        }
    }

    pub fn raw_patient(id: &str, height: f64, weight: f64) -> Value {
        json!({
            "id": id,
            "name": format!("Patient {id}"),
            "city": "Pune",
            "age": 30,
            "gender": "other",
            "height": height,
            "weight": weight
        })
    }

    pub fn records(entries: Vec<(&str, Value)>) -> RecordMap {
        entries
            .into_iter()
            .map(|(id, value)| (id.to_string(), value))
            .collect()
    }
}
