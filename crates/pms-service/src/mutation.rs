//! 患者创建

use crate::service::PatientService;
use pms_core::{Patient, PmsError, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

/// 创建成功的确认信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateAck {
    pub id: String,
    pub message: String,
}

impl CreateAck {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            message: format!("Patient successfully created with ID {}", id),
        }
    }
}

impl PatientService {
    /// 创建患者，ID已存在时返回 [`PmsError::Conflict`] 且不修改存储
    pub async fn create(&self, patient: Patient) -> Result<CreateAck> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.load_or_empty().await?;
        if records.contains_key(patient.id()) {
            warn!("患者 {} 已存在，拒绝创建", patient.id());
            return Err(PmsError::Conflict(patient.id().to_string()));
        }

        records.insert(patient.id().to_string(), Value::Object(patient.to_raw()));

        match self.store.save(&records).await {
            Ok(()) => info!("患者 {} 已创建", patient.id()),
            Err(e @ PmsError::StorageWriteFailed(_)) if !self.policy.fail_on_write_error => {
                error!("患者 {} 持久化失败，仅保留在本次请求中: {}", patient.id(), e);
            }
            Err(e) => return Err(e),
        }

        Ok(CreateAck::new(patient.id()))
    }
}
