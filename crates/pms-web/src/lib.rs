//! # PMS Web模块
//!
//! 基于axum的患者管理HTTP接口。

pub mod error;
pub mod handlers;
pub mod server;

pub use error::{ApiError, ApiResult};
pub use server::{create_app, WebServer};
