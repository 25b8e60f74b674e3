//! HTTP处理器

use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
};
use pms_core::{FieldError, Patient, PmsError};
use pms_service::PatientService;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

/// 处理器共享状态
pub type AppState = Arc<PatientService>;

/// 根路径处理器
pub async fn api_root() -> impl IntoResponse {
    Json(json!({ "message": "Patient Management System API" }))
}

pub async fn about() -> impl IntoResponse {
    Json(json!({ "detail": "Fully functional API to view Patient details" }))
}

/// 健康检查处理器
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[derive(Debug, Deserialize)]
pub struct AddParams {
    pub a: Option<i64>,
    pub b: Option<i64>,
}

/// 演示接口：两数相加
pub async fn add(query: Result<Query<AddParams>, QueryRejection>) -> ApiResult<Json<i64>> {
    let Query(params) = query?;
    let a = params.a.unwrap_or(1);
    let b = params.b.unwrap_or(2);
    a.checked_add(b)
        .map(Json)
        .ok_or_else(|| PmsError::InvalidArgument("sum is out of range".to_string()).into())
}

/// 列出全部患者
pub async fn view_patients(State(service): State<AppState>) -> ApiResult<Json<Vec<Patient>>> {
    Ok(Json(service.list_all().await?))
}

/// 按ID查看患者
pub async fn view_patient(
    State(service): State<AppState>,
    Path(patient_id): Path<String>,
) -> ApiResult<Json<Patient>> {
    Ok(Json(service.get(&patient_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct SortParams {
    pub sort_by: String,
    pub order: Option<String>,
}

/// 按身高、BMI或体重排序
pub async fn sort_patients(
    State(service): State<AppState>,
    query: Result<Query<SortParams>, QueryRejection>,
) -> ApiResult<Json<Vec<Patient>>> {
    let Query(params) = query?;
    info!("Sorting patients with query: {:?}", params);
    let patients = service
        .sort(&params.sort_by, params.order.as_deref())
        .await?;
    Ok(Json(patients))
}

/// 创建患者
pub async fn create_patient(
    State(service): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(body) = payload?;
    let Value::Object(raw) = body else {
        return Err(ApiError(PmsError::Validation(vec![FieldError::new(
            "body",
            "input should be a valid object",
        )])));
    };

    let patient = Patient::from_raw(&raw)?;
    let ack = service.create(patient).await?;

    Ok((StatusCode::CREATED, Json(json!({ "message": ack.message }))))
}
