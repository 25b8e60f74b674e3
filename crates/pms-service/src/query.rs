//! 患者查询：全部列出、按ID获取、排序

use crate::service::PatientService;
use pms_core::utils::{coerce_f64, compute_bmi};
use pms_core::{FieldError, Patient, PmsError, RawRecord, Result};
use serde_json::Value;
use std::cmp::Ordering;
use std::str::FromStr;
use tracing::{debug, info};

/// 可排序字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Height,
    Bmi,
    Weight,
}

impl SortField {
    pub const ALL: [SortField; 3] = [SortField::Height, SortField::Bmi, SortField::Weight];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Height => "height",
            SortField::Bmi => "bmi",
            SortField::Weight => "weight",
        }
    }

    /// 从原始记录中取排序键，缺失或非数字按0处理
    ///
    /// `bmi` 不会持久化，因此按原始身高体重现场计算。
    fn key(&self, entry: &Value) -> f64 {
        let number = |field: &str| entry.get(field).and_then(coerce_f64).unwrap_or(0.0);
        match self {
            SortField::Height => number("height"),
            SortField::Weight => number("weight"),
            SortField::Bmi => compute_bmi(number("height"), number("weight")),
        }
    }
}

impl FromStr for SortField {
    type Err = PmsError;

    fn from_str(s: &str) -> Result<Self> {
        SortField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = SortField::ALL.iter().map(SortField::as_str).collect();
                PmsError::InvalidArgument(format!(
                    "Invalid field: '{}'. Must be one of {}",
                    s,
                    names.join(", ")
                ))
            })
    }
}

/// 排序方向
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = PmsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(PmsError::InvalidArgument(
                "Order must be 'asc' or 'desc'".to_string(),
            )),
        }
    }
}

/// 把原始条目转换为患者记录，跳过缺少 `id` 或验证失败的条目
fn materialize<'a>(entries: impl IntoIterator<Item = &'a Value>) -> Vec<Patient> {
    let mut patients = Vec::new();
    let mut skipped = 0usize;

    for entry in entries {
        let parsed = match entry {
            Value::Object(raw) if raw.contains_key("id") => Patient::from_raw(raw).ok(),
            _ => None,
        };
        match parsed {
            Some(patient) => patients.push(patient),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        debug!("跳过 {} 条无效记录", skipped);
    }
    patients
}

impl PatientService {
    /// 列出全部有效患者
    pub async fn list_all(&self) -> Result<Vec<Patient>> {
        let records = self.load_or_empty().await?;
        Ok(materialize(records.values()))
    }

    /// 按ID获取患者
    ///
    /// 存储条目缺少 `id` 时以键补齐；条目无法通过验证时返回 [`PmsError::CorruptRecord`]。
    pub async fn get(&self, id: &str) -> Result<Patient> {
        let records = self.load_or_empty().await?;
        let entry = records
            .get(id)
            .ok_or_else(|| PmsError::NotFound(id.to_string()))?;

        let mut raw: RawRecord = match entry {
            Value::Object(raw) => raw.clone(),
            _ => {
                return Err(PmsError::CorruptRecord {
                    id: id.to_string(),
                    errors: vec![FieldError::new("record", "input should be an object")],
                });
            }
        };
        if !raw.contains_key("id") {
            raw.insert("id".to_string(), Value::String(id.to_string()));
        }

        Patient::from_raw(&raw).map_err(|e| match e {
            PmsError::Validation(errors) => PmsError::CorruptRecord {
                id: id.to_string(),
                errors,
            },
            other => other,
        })
    }

    /// 解析字段与方向后排序，方向缺省为升序
    pub async fn sort(&self, field: &str, order: Option<&str>) -> Result<Vec<Patient>> {
        let field: SortField = field.parse()?;
        let order = order
            .map(str::parse::<SortOrder>)
            .transpose()?
            .unwrap_or_default();
        self.sort_by(field, order).await
    }

    /// 对原始条目稳定排序后再转换为患者记录
    pub async fn sort_by(&self, field: SortField, order: SortOrder) -> Result<Vec<Patient>> {
        let records = self.load_or_empty().await?;
        info!("按 {} {:?} 排序 {} 条记录", field.as_str(), order, records.len());

        let mut entries: Vec<(f64, &Value)> = records
            .values()
            .map(|entry| (field.key(entry), entry))
            .collect();
        // 键均为有限值；-0.0 与 0.0 视为相等以保持稳定
        entries.sort_by(|(a, _), (b, _)| {
            let ordering = a.partial_cmp(b).unwrap_or(Ordering::Equal);
            match order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        Ok(materialize(entries.into_iter().map(|(_, entry)| entry)))
    }
}
