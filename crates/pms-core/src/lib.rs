//! # PMS Core
//!
//! 患者管理系统的核心模块，提供患者数据模型、字段验证、派生字段计算和统一错误定义。

pub mod error;
pub mod models;
pub mod utils;
pub mod validator;

pub use error::{FieldError, PmsError, Result};
pub use models::*;
pub use validator::{PatientValidator, ValidationResult};
