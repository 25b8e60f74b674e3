//! 错误定义模块

use serde::Serialize;
use thiserror::Error;

/// 单个字段的验证错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// PMS系统统一错误类型
#[derive(Error, Debug)]
pub enum PmsError {
    #[error("验证错误: {}", join_field_errors(.0))]
    Validation(Vec<FieldError>),

    #[error("患者未找到: {0}")]
    NotFound(String),

    #[error("患者已存在: {0}")]
    Conflict(String),

    #[error("参数无效: {0}")]
    InvalidArgument(String),

    #[error("存储记录损坏: {id} ({})", join_field_errors(.errors))]
    CorruptRecord { id: String, errors: Vec<FieldError> },

    #[error("存储不可用: {0}")]
    StorageUnavailable(String),

    #[error("存储写入失败: {0}")]
    StorageWriteFailed(String),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("系统内部错误: {0}")]
    Internal(String),
}

/// PMS系统统一结果类型
pub type Result<T> = std::result::Result<T, PmsError>;
