//! 核心数据模型定义

use crate::error::Result;
use crate::utils::compute_bmi;
use crate::validator::PatientValidator;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::str::FromStr;

/// 单条患者记录的原始字段（存储格式，不含派生字段）
pub type RawRecord = Map<String, Value>;

/// 完整存储内容：患者ID -> 原始字段，保持文件中的顺序
pub type RecordMap = Map<String, Value>;

/// 性别枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            other => Err(format!("unknown gender: {}", other)),
        }
    }
}

/// BMI分类结论
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Verdict {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl Verdict {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            Verdict::Underweight
        } else if bmi < 25.0 {
            Verdict::Normal
        } else if bmi < 30.0 {
            Verdict::Overweight
        } else {
            Verdict::Obese
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Verdict::Underweight => "Underweight",
            Verdict::Normal => "Normal",
            Verdict::Overweight => "Overweight",
            Verdict::Obese => "Obese",
        };
        f.write_str(text)
    }
}

/// 已验证的患者记录
///
/// 只能通过 [`Patient::from_raw`] 构造，构造时完成全部字段验证，
/// `bmi` 和 `verdict` 随即根据身高体重计算。序列化结果包含派生字段。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Patient {
    id: String,
    name: String,
    city: String,
    age: u32,
    gender: Gender,
    height: f64, // 米
    weight: f64, // 千克
    bmi: f64,
    verdict: Verdict,
}

impl Patient {
    /// 从原始字段构造并验证患者记录
    pub fn from_raw(raw: &RawRecord) -> Result<Self> {
        PatientValidator::new().validate(raw)
    }

    pub(crate) fn from_parts(
        id: String,
        name: String,
        city: String,
        age: u32,
        gender: Gender,
        height: f64,
        weight: f64,
    ) -> Self {
        let bmi = compute_bmi(height, weight);
        Self {
            id,
            name,
            city,
            age,
            gender,
            height,
            weight,
            bmi,
            verdict: Verdict::from_bmi(bmi),
        }
    }

    /// 转换为存储格式，去掉派生字段
    pub fn to_raw(&self) -> RawRecord {
        let mut raw = RawRecord::new();
        raw.insert("id".into(), json!(self.id));
        raw.insert("name".into(), json!(self.name));
        raw.insert("city".into(), json!(self.city));
        raw.insert("age".into(), json!(self.age));
        raw.insert("gender".into(), json!(self.gender.as_str()));
        raw.insert("height".into(), json!(self.height));
        raw.insert("weight".into(), json!(self.weight));
        raw
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn bmi(&self) -> f64 {
        self.bmi
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }
}
