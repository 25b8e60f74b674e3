//! 患者记录验证模块
//!
//! 对原始字段逐一检查，收集全部字段错误后再统一返回。

use crate::error::{FieldError, PmsError, Result};
use crate::models::{Gender, Patient, RawRecord};
use crate::utils::{coerce_f64, coerce_i64};
use serde_json::Value;
use tracing::debug;

/// 姓名最大长度
pub const NAME_MAX_LEN: usize = 50;
/// 年龄下界（不含）
pub const AGE_LOWER_EXCLUSIVE: i64 = 0;
/// 年龄上界（不含）
pub const AGE_UPPER_EXCLUSIVE: i64 = 100;

/// 验证结果
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<FieldError>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// 患者记录验证器
#[derive(Debug, Default)]
pub struct PatientValidator;

impl PatientValidator {
    pub fn new() -> Self {
        Self
    }

    /// 验证原始字段并构造患者记录
    pub fn validate(&self, raw: &RawRecord) -> Result<Patient> {
        let mut result = ValidationResult::new();

        let id = self.required_string(raw, "id", &mut result);
        let name = self.validate_name(raw, &mut result);
        let city = self.required_string(raw, "city", &mut result);
        let age = self.validate_age(raw, &mut result);
        let gender = self.validate_gender(raw, &mut result);
        let height = self.required_number(raw, "height", &mut result);
        let weight = self.validate_weight(raw, &mut result);

        match (id, name, city, age, gender, height, weight) {
            (Some(id), Some(name), Some(city), Some(age), Some(gender), Some(height), Some(weight))
                if result.is_valid() =>
            {
                Ok(Patient::from_parts(id, name, city, age, gender, height, weight))
            }
            _ => {
                debug!("患者记录验证失败: {} 个字段错误", result.errors.len());
                Err(PmsError::Validation(result.errors))
            }
        }
    }

    fn field<'a>(&self, raw: &'a RawRecord, field: &str, result: &mut ValidationResult) -> Option<&'a Value> {
        match raw.get(field) {
            None | Some(Value::Null) => {
                result.add_error(field, "field required");
                None
            }
            Some(value) => Some(value),
        }
    }

    fn required_string(&self, raw: &RawRecord, field: &str, result: &mut ValidationResult) -> Option<String> {
        match self.field(raw, field, result)? {
            Value::String(s) => Some(s.clone()),
            _ => {
                result.add_error(field, "input should be a valid string");
                None
            }
        }
    }

    fn validate_name(&self, raw: &RawRecord, result: &mut ValidationResult) -> Option<String> {
        let name = self.required_string(raw, "name", result)?;
        if name.chars().count() > NAME_MAX_LEN {
            result.add_error(
                "name",
                format!("string should have at most {} characters", NAME_MAX_LEN),
            );
            return None;
        }
        Some(name)
    }

    fn required_number(&self, raw: &RawRecord, field: &str, result: &mut ValidationResult) -> Option<f64> {
        let value = self.field(raw, field, result)?;
        let number = coerce_f64(value);
        if number.is_none() {
            result.add_error(field, "input should be a valid number");
        }
        number
    }

    fn validate_age(&self, raw: &RawRecord, result: &mut ValidationResult) -> Option<u32> {
        let value = self.field(raw, "age", result)?;
        let Some(age) = coerce_i64(value) else {
            result.add_error("age", "input should be a valid integer");
            return None;
        };

        if age <= AGE_LOWER_EXCLUSIVE {
            result.add_error("age", format!("input should be greater than {}", AGE_LOWER_EXCLUSIVE));
            None
        } else if age >= AGE_UPPER_EXCLUSIVE {
            result.add_error("age", format!("input should be less than {}", AGE_UPPER_EXCLUSIVE));
            None
        } else {
            u32::try_from(age).ok()
        }
    }

    fn validate_gender(&self, raw: &RawRecord, result: &mut ValidationResult) -> Option<Gender> {
        let value = self.field(raw, "gender", result)?;
        let gender = value.as_str().and_then(|s| s.parse::<Gender>().ok());
        if gender.is_none() {
            result.add_error("gender", "input should be 'male', 'female' or 'other'");
        }
        gender
    }

    fn validate_weight(&self, raw: &RawRecord, result: &mut ValidationResult) -> Option<f64> {
        let weight = self.required_number(raw, "weight", result)?;
        if weight <= 0.0 {
            result.add_error("weight", "input should be greater than 0");
            return None;
        }
        Some(weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawRecord {
        value.as_object().cloned().unwrap()
    }

    fn fields(err: PmsError) -> Vec<String> {
        match err {
            PmsError::Validation(errors) => errors.into_iter().map(|e| e.field).collect(),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_every_violation_is_reported() {
        let record = raw(json!({
            "id": "P001",
            "name": "x".repeat(51),
            "age": 100,
            "gender": "unknown",
            "height": "tall",
            "weight": -3
        }));

        let err = PatientValidator::new().validate(&record).unwrap_err();
        assert_eq!(fields(err), vec!["name", "city", "age", "gender", "height", "weight"]);
    }

    #[test]
    fn test_age_bounds_are_exclusive() {
        let base = json!({
            "id": "P1", "name": "A", "city": "B", "gender": "other",
            "height": 1.6, "weight": 50
        });

        for (age, ok) in [(0, false), (1, true), (99, true), (100, false), (-5, false)] {
            let mut record = raw(base.clone());
            record.insert("age".into(), json!(age));
            assert_eq!(PatientValidator::new().validate(&record).is_ok(), ok, "age {age}");
        }
    }

    #[test]
    fn test_wrong_string_type_rejected() {
        let record = raw(json!({
            "id": 17, "name": "A", "city": "B", "age": 20,
            "gender": "male", "height": 1.6, "weight": 50
        }));

        let err = PatientValidator::new().validate(&record).unwrap_err();
        assert_eq!(fields(err), vec!["id"]);
    }

    #[test]
    fn test_null_counts_as_missing() {
        let record = raw(json!({
            "id": "P1", "name": null, "city": "B", "age": 20,
            "gender": "male", "height": 1.6, "weight": 50
        }));

        match PatientValidator::new().validate(&record).unwrap_err() {
            PmsError::Validation(errors) => {
                assert_eq!(errors, vec![FieldError::new("name", "field required")]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_name_length_counts_characters() {
        let record = raw(json!({
            "id": "P1", "name": "é".repeat(50), "city": "B", "age": 20,
            "gender": "female", "height": 1.6, "weight": 50
        }));

        assert!(PatientValidator::new().validate(&record).is_ok());
    }
}
