//! HTTP错误响应

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use pms_core::{FieldError, PmsError};
use serde_json::json;
use tracing::error;

/// 包装 [`PmsError`] 以转换为HTTP响应
#[derive(Debug)]
pub struct ApiError(pub PmsError);

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl From<PmsError> for ApiError {
    fn from(err: PmsError) -> Self {
        Self(err)
    }
}

/// 请求体无法解析为JSON，按字段验证错误返回422
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(PmsError::Validation(vec![FieldError::new(
            "body",
            rejection.body_text(),
        )]))
    }
}

/// 查询参数缺失或类型不符，按字段验证错误返回422
impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(PmsError::Validation(vec![FieldError::new(
            "query",
            rejection.body_text(),
        )]))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self.0 {
            PmsError::NotFound(_) => (StatusCode::NOT_FOUND, json!("Patient not found")),
            PmsError::Conflict(id) => (
                StatusCode::BAD_REQUEST,
                json!(format!("Patient with ID {} already exists", id)),
            ),
            PmsError::InvalidArgument(msg) => (StatusCode::BAD_REQUEST, json!(msg)),
            PmsError::Validation(errors) => (StatusCode::UNPROCESSABLE_ENTITY, json!(errors)),
            other => {
                error!("请求处理失败: {}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, json!(other.to_string()))
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
