//! 通用工具函数

use serde_json::Value;

/// 按小数位数舍入
///
/// 对浮点数的精确十进制值做银行家舍入（四舍六入五成双），
/// 避免先乘以 `10^places` 引入的误差。
pub fn round_to(value: f64, places: usize) -> f64 {
    format!("{:.*}", places, value).parse().unwrap_or(value)
}

/// 计算BMI，保留两位小数
///
/// 身高为0或结果不是有限值时返回 `0.0`，不向上传播除法错误。
pub fn compute_bmi(height: f64, weight: f64) -> f64 {
    if height == 0.0 {
        return 0.0;
    }

    let bmi = weight / (height * height);
    if !bmi.is_finite() {
        return 0.0;
    }
    round_to(bmi, 2)
}

/// 宽松地把JSON值解析为浮点数（数字或数字字符串）
pub fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

/// 宽松地把JSON值解析为整数
///
/// 接受整数、小数部分为0的浮点数（如表单提交的 `30.0`）以及对应的字符串。
pub fn coerce_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral_f64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral_f64))
        }
        _ => None,
    }
}

fn integral_f64(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compute_bmi() {
        assert_eq!(compute_bmi(1.75, 70.0), 22.86);
        assert_eq!(compute_bmi(1.80, 81.0), 25.0);
        assert_eq!(compute_bmi(0.0, 70.0), 0.0);
        assert_eq!(compute_bmi(-0.0, 70.0), 0.0);
    }

    #[test]
    fn test_compute_bmi_rounds_half_to_even_on_exact_value() {
        assert_eq!(compute_bmi(2.0, 30.7), 7.67);
        assert_eq!(compute_bmi(1.44, 32.4), 15.62);
        assert_eq!(compute_bmi(2.0, 88.5), 22.12);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(22.857142, 2), 22.86);
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(0.375, 2), 0.38);
        assert_eq!(round_to(-1.005, 2), -1.0);
    }

    #[test]
    fn test_coerce_i64() {
        assert_eq!(coerce_i64(&json!(30)), Some(30));
        assert_eq!(coerce_i64(&json!(30.0)), Some(30));
        assert_eq!(coerce_i64(&json!(" 42 ")), Some(42));
        assert_eq!(coerce_i64(&json!("42.0")), Some(42));
        assert_eq!(coerce_i64(&json!(30.5)), None);
        assert_eq!(coerce_i64(&json!("abc")), None);
        assert_eq!(coerce_i64(&json!(true)), None);
    }

    #[test]
    fn test_coerce_f64() {
        assert_eq!(coerce_f64(&json!(1.75)), Some(1.75));
        assert_eq!(coerce_f64(&json!(70)), Some(70.0));
        assert_eq!(coerce_f64(&json!("1.6")), Some(1.6));
        assert_eq!(coerce_f64(&json!("inf")), None);
        assert_eq!(coerce_f64(&json!(null)), None);
    }
}
