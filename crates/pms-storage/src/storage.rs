//! 患者记录存储

use async_trait::async_trait;
use pms_core::{PmsError, RecordMap, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 记录存储接口
///
/// 每次操作都完整读取或完整覆盖整个存储，不支持局部读写。
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// 读取全部记录
    ///
    /// 存储不存在或内容无法解析时返回 [`PmsError::StorageUnavailable`]，
    /// 由调用方决定是否降级为空存储。
    async fn load(&self) -> Result<RecordMap>;

    /// 用给定内容覆盖整个存储
    async fn save(&self, records: &RecordMap) -> Result<()>;

    /// 存储位置描述，用于日志
    fn describe(&self) -> String;
}

/// 文件存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// 患者数据文件路径
    pub data_file: String,
    /// 先写临时文件再重命名
    #[serde(default)]
    pub atomic_writes: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: "patients.json".to_string(),
            atomic_writes: false,
        }
    }
}

/// 基于JSON文件的记录存储
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    atomic_writes: bool,
}

impl JsonFileStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            path: PathBuf::from(&config.data_file),
            atomic_writes: config.atomic_writes,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 序列化为4空格缩进的JSON
    fn encode(records: &RecordMap) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        records.serialize(&mut serializer)?;
        Ok(buf)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn write_file(&self, data: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        if self.atomic_writes {
            let temp = self.temp_path();
            tokio::fs::write(&temp, data).await?;
            tokio::fs::rename(&temp, &self.path).await
        } else {
            tokio::fs::write(&self.path, data).await
        }
    }
}

#[async_trait]
impl RecordStore for JsonFileStore {
    async fn load(&self) -> Result<RecordMap> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PmsError::StorageUnavailable(format!(
                    "{} 不存在",
                    self.path.display()
                )));
            }
            Err(e) => return Err(e.into()),
        };

        let records: RecordMap = serde_json::from_slice(&data).map_err(|e| {
            PmsError::StorageUnavailable(format!("{} 解析失败: {}", self.path.display(), e))
        })?;

        debug!("从 {} 读取 {} 条记录", self.path.display(), records.len());
        Ok(records)
    }

    async fn save(&self, records: &RecordMap) -> Result<()> {
        let data = Self::encode(records)?;
        self.write_file(&data).await.map_err(|e| {
            PmsError::StorageWriteFailed(format!("{}: {}", self.path.display(), e))
        })?;

        info!("已写入 {} 条记录到 {}", records.len(), self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        format!("json-file:{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir, atomic_writes: bool) -> JsonFileStore {
        JsonFileStore::new(&StorageConfig {
            data_file: dir.path().join("patients.json").to_string_lossy().to_string(),
            atomic_writes,
        })
    }

    fn sample() -> RecordMap {
        let value = json!({
            "P002": {"id": "P002", "name": "B", "city": "Y", "age": 40, "gender": "female", "height": 1.6, "weight": 55.0},
            "P001": {"id": "P001", "name": "A", "city": "X", "age": 30, "gender": "male", "height": 1.75, "weight": 70.0}
        });
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_missing_file_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, false);

        assert!(matches!(store.load().await, Err(PmsError::StorageUnavailable(_))));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, false);

        for contents in ["{not json", "", "[1, 2, 3]"] {
            std::fs::write(store.path(), contents).unwrap();
            assert!(
                matches!(store.load().await, Err(PmsError::StorageUnavailable(_))),
                "contents {contents:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_save_then_load_keeps_order() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, false);

        store.save(&sample()).await.unwrap();
        let loaded = store.load().await.unwrap();

        assert_eq!(loaded, sample());
        let ids: Vec<&str> = loaded.keys().map(String::as_str).collect();
        assert_eq!(ids, ["P002", "P001"]);
    }

    #[tokio::test]
    async fn test_file_is_indented_with_four_spaces() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, false);

        store.save(&sample()).await.unwrap();
        let text = std::fs::read_to_string(store.path()).unwrap();

        assert!(text.starts_with("{\n    \"P002\": {\n        \"id\": \"P002\""));
    }

    #[tokio::test]
    async fn test_atomic_write_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir, true);

        store.save(&sample()).await.unwrap();
        store.save(&RecordMap::new()).await.unwrap();

        assert!(store.load().await.unwrap().is_empty());
        assert!(!dir.path().join("patients.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("data").join("records.json");
        let store = JsonFileStore::new(&StorageConfig {
            data_file: nested.to_string_lossy().to_string(),
            atomic_writes: false,
        });

        store.save(&sample()).await.unwrap();
        assert!(nested.exists());
    }

    #[tokio::test]
    async fn test_write_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        // 目标路径是目录，写入必然失败
        let store = JsonFileStore::new(&StorageConfig {
            data_file: dir.path().to_string_lossy().to_string(),
            atomic_writes: false,
        });

        assert!(matches!(
            store.save(&sample()).await,
            Err(PmsError::StorageWriteFailed(_))
        ));
    }
}
