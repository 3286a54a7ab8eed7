//! 核心错误处理模块

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::app::user::repository::RepoError;

/// 核心错误类型
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// 资源不存在，响应体为空
    #[error("resource not found")]
    NotFound,
    #[error(transparent)]
    Repository(#[from] RepoError),
}

/// 错误响应结构
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub code: u16,
    pub timestamp: String,
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        match self {
            CoreError::NotFound => StatusCode::NOT_FOUND.into_response(),
            CoreError::Repository(err) => {
                error!("Storage error: {}", err);

                let status = StatusCode::INTERNAL_SERVER_ERROR;
                let error_response = ErrorResponse {
                    error: "INTERNAL_SERVER_ERROR".to_string(),
                    message: "Storage error".to_string(),
                    code: status.as_u16(),
                    timestamp: chrono::Utc::now().to_rfc3339(),
                };

                (status, axum::Json(error_response)).into_response()
            }
        }
    }
}
